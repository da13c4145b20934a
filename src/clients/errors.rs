//! Transport-level error types.
//!
//! These errors describe failures that happen before an HTTP status code is
//! available: an invalid request that never left the process, or a network
//! failure while sending it. Status-code failures are mapped separately by
//! [`crate::rest::ApiError::from_response`].
//!
//! # Example
//!
//! ```rust,ignore
//! use github_api::clients::{Transport, TransportError};
//!
//! match transport.send(&request).await {
//!     Ok(response) => println!("Status {}", response.code),
//!     Err(TransportError::Timeout { url }) => println!("Timed out calling {url}"),
//!     Err(e) => println!("Connection error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when an HTTP request fails validation.
///
/// Raised before a request is sent if it fails validation checks, such as
/// a body supplied to a `GET` or a `POST` without a body.
///
/// # Example
///
/// ```rust
/// use github_api::clients::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::MissingBody {
///     method: "post".to_string(),
/// };
///
/// assert_eq!(error.to_string(), "Cannot use post without specifying data.");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST, PATCH or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A GET request was given a body.
    #[error("Cannot send a body with {method}.")]
    UnexpectedBody {
        /// The HTTP method that does not take a body.
        method: String,
    },

    /// The request URL is empty.
    #[error("Request URL cannot be empty.")]
    EmptyUrl,
}

/// Failure to obtain any HTTP response at all.
///
/// Never retried by this crate; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request validation failed before sending.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// The request did not complete within the configured timeout.
    #[error("Request to {url} timed out")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// DNS, TLS, connection refused/reset and other I/O failures.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl TransportError {
    /// Classifies a `reqwest` send error.
    #[must_use]
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: error.url().map(ToString::to_string).unwrap_or_default(),
            }
        } else {
            Self::Network(error)
        }
    }
}

// Verify TransportError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TransportError>();
};
