//! Error taxonomy for API operations.
//!
//! Every 4xx/5xx response is converted into exactly one [`ApiError`] variant
//! at the point the response is interpreted:
//!
//! - **400**: [`ApiError::BadRequest`]
//! - **401**: [`ApiError::BadCredentials`]
//! - **403**: [`ApiError::Forbidden`], or [`ApiError::RateLimitExceeded`] when
//!   the response signals rate limiting (also used for 429)
//! - **404**: [`ApiError::NotFound`]
//! - **405**: [`ApiError::MethodNotAllowed`]
//! - **406**: [`ApiError::NotAcceptable`]
//! - **422**: [`ApiError::Unprocessable`]
//! - **451**: [`ApiError::UnavailableForLegalReasons`]
//! - **Other 4xx**: [`ApiError::Client`]
//! - **5xx**: [`ApiError::Server`]
//!
//! Connectivity failures arrive as [`ApiError::Transport`]. Nothing here is
//! retried; retry policy belongs to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use github_api::rest::ApiError;
//!
//! match Repository::get(&client, "octocat", "hello-world").await {
//!     Ok(repo) => println!("Found: {}", repo.full_name),
//!     Err(ApiError::NotFound(e)) => println!("No such repository ({})", e.message),
//!     Err(ApiError::RateLimitExceeded(_)) => println!("Slow down"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::clients::{HttpResponse, TransportError};

/// Details of a failed HTTP response.
///
/// `Display` renders the numeric status followed by the API message, plus
/// the structured sub-errors when the API supplied any.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusError {
    /// The HTTP status code.
    pub status: u16,
    /// The `message` field of the error body, or the raw body text.
    pub message: String,
    /// The `errors` array of the error body (validation details).
    pub errors: Vec<Value>,
    /// The `documentation_url` field of the error body.
    pub documentation_url: Option<String>,
    /// The `X-GitHub-Request-Id` header value.
    pub request_id: Option<String>,
}

impl StatusError {
    /// Extracts error details from a response.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        let (message, errors, documentation_url) = match &response.body {
            Value::Object(map) => (
                map.get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                map.get("errors")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
                map.get("documentation_url")
                    .and_then(Value::as_str)
                    .map(ToString::to_string),
            ),
            Value::String(text) => (text.clone(), Vec::new(), None),
            Value::Null => (String::new(), Vec::new(), None),
            other => (other.to_string(), Vec::new(), None),
        };

        Self {
            status: response.code,
            message,
            errors,
            documentation_url,
            request_id: response.request_id().map(ToString::to_string),
        }
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.message)?;
        if !self.errors.is_empty() {
            write!(f, " {}", Value::Array(self.errors.clone()))?;
        }
        Ok(())
    }
}

/// Error type for every API operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No HTTP response was obtained (DNS, timeout, reset, invalid request).
    #[error("Connection error: {0}")]
    Transport(#[from] TransportError),

    /// HTTP 400.
    #[error("Bad request: {0}")]
    BadRequest(StatusError),

    /// HTTP 401.
    #[error("Bad credentials: {0}")]
    BadCredentials(StatusError),

    /// HTTP 403 that is not rate limiting.
    #[error("Forbidden: {0}")]
    Forbidden(StatusError),

    /// HTTP 403 or 429 caused by a primary or secondary rate limit.
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(StatusError),

    /// HTTP 404.
    #[error("Not found: {0}")]
    NotFound(StatusError),

    /// HTTP 405.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(StatusError),

    /// HTTP 406.
    #[error("Not acceptable: {0}")]
    NotAcceptable(StatusError),

    /// HTTP 422, typically carrying validation sub-errors.
    #[error("Unprocessable entity: {0}")]
    Unprocessable(StatusError),

    /// HTTP 451.
    #[error("Unavailable for legal reasons: {0}")]
    UnavailableForLegalReasons(StatusError),

    /// Any other 4xx status.
    #[error("Client error: {0}")]
    Client(StatusError),

    /// Any 5xx status.
    #[error("Server error: {0}")]
    Server(StatusError),

    /// A required field was absent while building a resource.
    #[error("{resource} is missing required field '{field}'")]
    IncompleteResource {
        /// The resource type name (e.g. "Issue").
        resource: &'static str,
        /// The offending field.
        field: String,
    },

    /// A response body had a fundamentally different shape than expected.
    #[error("Unprocessable response body: expected {expected}, got {actual}")]
    UnprocessableResponseBody {
        /// What the caller expected (e.g. "a JSON object").
        expected: &'static str,
        /// The JSON type that was received.
        actual: &'static str,
    },

    /// Neither a typed field nor the raw data holds the requested attribute.
    #[error("{resource} has no attribute '{name}'")]
    UnknownAttribute {
        /// The resource type name.
        resource: &'static str,
        /// The attribute that was requested.
        name: String,
    },

    /// A caller-supplied parameter failed validation before any request.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Request parameters or resource data could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// Maps a failed response to its status-specific variant.
    ///
    /// Intended for responses with status >= 400.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        let details = StatusError::from_response(response);
        match response.code {
            400 => Self::BadRequest(details),
            401 => Self::BadCredentials(details),
            403 if is_rate_limited(response, &details) => Self::RateLimitExceeded(details),
            403 => Self::Forbidden(details),
            404 => Self::NotFound(details),
            405 => Self::MethodNotAllowed(details),
            406 => Self::NotAcceptable(details),
            422 => Self::Unprocessable(details),
            429 => Self::RateLimitExceeded(details),
            451 => Self::UnavailableForLegalReasons(details),
            code if code >= 500 => Self::Server(details),
            _ => Self::Client(details),
        }
    }

    /// Returns the status details for status-mapped variants.
    #[must_use]
    pub const fn status_error(&self) -> Option<&StatusError> {
        match self {
            Self::BadRequest(e)
            | Self::BadCredentials(e)
            | Self::Forbidden(e)
            | Self::RateLimitExceeded(e)
            | Self::NotFound(e)
            | Self::MethodNotAllowed(e)
            | Self::NotAcceptable(e)
            | Self::Unprocessable(e)
            | Self::UnavailableForLegalReasons(e)
            | Self::Client(e)
            | Self::Server(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the HTTP status code, if this error came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status_error().map(|e| e.status)
    }

    /// Returns the request ID if available.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.status_error().and_then(|e| e.request_id.as_deref())
    }
}

/// Returns the JSON type name of a value, for error reporting.
#[must_use]
pub const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_rate_limited(response: &HttpResponse, details: &StatusError) -> bool {
    response.rate_limit.is_some_and(|limit| limit.remaining == 0)
        || details.message.to_lowercase().contains("rate limit")
}

// Verify ApiError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn response(code: u16, body: Value) -> HttpResponse {
        HttpResponse::new(code, HashMap::new(), body)
    }

    #[test]
    fn test_status_codes_map_to_variants() {
        let cases: &[(u16, fn(&ApiError) -> bool)] = &[
            (400, |e| matches!(e, ApiError::BadRequest(_))),
            (401, |e| matches!(e, ApiError::BadCredentials(_))),
            (403, |e| matches!(e, ApiError::Forbidden(_))),
            (404, |e| matches!(e, ApiError::NotFound(_))),
            (405, |e| matches!(e, ApiError::MethodNotAllowed(_))),
            (406, |e| matches!(e, ApiError::NotAcceptable(_))),
            (409, |e| matches!(e, ApiError::Client(_))),
            (422, |e| matches!(e, ApiError::Unprocessable(_))),
            (429, |e| matches!(e, ApiError::RateLimitExceeded(_))),
            (451, |e| matches!(e, ApiError::UnavailableForLegalReasons(_))),
            (500, |e| matches!(e, ApiError::Server(_))),
            (503, |e| matches!(e, ApiError::Server(_))),
        ];

        for (code, check) in cases {
            let error = ApiError::from_response(&response(*code, json!({"message": "x"})));
            assert!(check(&error), "status {code} mapped to {error:?}");
            assert_eq!(error.status(), Some(*code));
        }
    }

    #[test]
    fn test_403_with_rate_limit_message_is_rate_limited() {
        let error = ApiError::from_response(&response(
            403,
            json!({"message": "API rate limit exceeded for 127.0.0.1."}),
        ));
        assert!(matches!(error, ApiError::RateLimitExceeded(_)));
    }

    #[test]
    fn test_403_with_exhausted_headers_is_rate_limited() {
        let mut headers = HashMap::new();
        headers.insert("x-ratelimit-limit".to_string(), vec!["60".to_string()]);
        headers.insert("x-ratelimit-remaining".to_string(), vec!["0".to_string()]);
        headers.insert("x-ratelimit-reset".to_string(), vec!["1700000000".to_string()]);
        let error = ApiError::from_response(&HttpResponse::new(
            403,
            headers,
            json!({"message": "Forbidden"}),
        ));
        assert!(matches!(error, ApiError::RateLimitExceeded(_)));
    }

    #[test]
    fn test_display_includes_status_and_message() {
        let error = ApiError::from_response(&response(
            404,
            json!({"message": "Not Found", "documentation_url": "https://docs.github.com"}),
        ));
        let text = error.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("Not Found"));
        assert_eq!(
            error.status_error().unwrap().documentation_url.as_deref(),
            Some("https://docs.github.com")
        );
    }

    #[test]
    fn test_validation_sub_errors_are_preserved() {
        let error = ApiError::from_response(&response(
            422,
            json!({
                "message": "Validation Failed",
                "errors": [{"resource": "Issue", "field": "title", "code": "missing_field"}]
            }),
        ));
        let details = error.status_error().unwrap();
        assert_eq!(details.errors.len(), 1);
        assert!(error.to_string().contains("missing_field"));
    }

    #[test]
    fn test_raw_text_body_becomes_message() {
        let error = ApiError::from_response(&response(502, json!("Bad Gateway")));
        assert!(error.to_string().contains("502 Bad Gateway"));
    }

    #[test]
    fn test_request_id_is_exposed() {
        let mut headers = HashMap::new();
        headers.insert("X-GitHub-Request-Id".to_string(), vec!["ABCD:1".to_string()]);
        let error = ApiError::from_response(&HttpResponse::new(500, headers, json!(null)));
        assert_eq!(error.request_id(), Some("ABCD:1"));
    }

    #[test]
    fn test_non_status_errors_have_no_status() {
        let error = ApiError::IncompleteResource {
            resource: "Issue",
            field: "number".to_string(),
        };
        assert!(error.status().is_none());
        assert!(error.to_string().contains("number"));
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!([1])), "array");
        assert_eq!(json_type_name(&json!({"a": 1})), "object");
        assert_eq!(json_type_name(&json!("s")), "string");
    }
}
