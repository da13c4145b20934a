//! Error types for the GitHub API client.
//!
//! This module contains error types used throughout the crate for configuration
//! and validation errors. Errors raised while talking to the API live in
//! [`crate::rest::ApiError`].
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use github_api::{AccessToken, ConfigError};
//!
//! let result = AccessToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAccessToken)));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
///
/// This enum represents all possible errors that can occur when creating
/// or validating configuration types. Each variant provides a clear,
/// actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Access token cannot be empty.
    #[error("Access token cannot be empty. Omit the token for anonymous access instead.")]
    EmptyAccessToken,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide an absolute http(s) URL (e.g., 'https://api.github.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM-DD' (e.g., '2022-11-28').")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// Page size is out of range.
    #[error("Invalid page size {per_page}. GitHub accepts between 1 and 100 items per page.")]
    InvalidPerPage {
        /// The page size that was provided.
        per_page: u32,
    },
}
