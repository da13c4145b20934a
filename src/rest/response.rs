//! Response interpretation.
//!
//! These helpers are the single place where a status code becomes either a
//! value or an [`ApiError`]. Every status >= 400 is converted to its mapped
//! error; none is silently dropped except where a caller explicitly names a
//! "not found" status as meaning `false`.

use serde_json::Value;

use crate::clients::HttpResponse;
use crate::rest::resource::{ETAG_KEY, LAST_MODIFIED_KEY};
use crate::rest::ApiError;

/// Maps a response to a boolean.
///
/// - `success` status: `true`
/// - `not_found` status: `false`
/// - any other status >= 400: the status-mapped error
/// - anything else: `false`
///
/// # Errors
///
/// Returns the status-mapped [`ApiError`] for unexpected statuses >= 400.
///
/// # Example
///
/// ```rust
/// use github_api::clients::HttpResponse;
/// use github_api::rest::interpret_as_boolean;
/// use std::collections::HashMap;
///
/// let starred = HttpResponse::new(204, HashMap::new(), serde_json::Value::Null);
/// assert!(interpret_as_boolean(&starred, 204, 404).unwrap());
///
/// let not_starred = HttpResponse::new(404, HashMap::new(), serde_json::Value::Null);
/// assert!(!interpret_as_boolean(&not_starred, 204, 404).unwrap());
/// ```
pub fn interpret_as_boolean(
    response: &HttpResponse,
    success: u16,
    not_found: u16,
) -> Result<bool, ApiError> {
    if response.code == success {
        Ok(true)
    } else if response.code == not_found {
        Ok(false)
    } else if response.code >= 400 {
        Err(ApiError::from_response(response))
    } else {
        Ok(false)
    }
}

/// Returns the body of an `expected`-status response, or `None`.
///
/// A 404 or an empty body yields `None`. Object bodies get the response's
/// cache tokens embedded so a resource built from them can refresh
/// conditionally.
///
/// # Errors
///
/// Returns the status-mapped [`ApiError`] for other statuses >= 400.
pub fn interpret_as_json(response: &HttpResponse, expected: u16) -> Result<Option<Value>, ApiError> {
    if interpret_as_boolean(response, expected, 404)? && response.has_body() {
        Ok(Some(with_cache_tokens(response)))
    } else {
        Ok(None)
    }
}

/// Returns the body of any non-error response.
///
/// Unlike [`interpret_as_json`], a 404 is an error here. An empty body
/// yields `Value::Null`.
///
/// # Errors
///
/// Returns the status-mapped [`ApiError`] for any status >= 400.
pub fn expect_json(response: &HttpResponse) -> Result<Value, ApiError> {
    if response.code >= 400 {
        return Err(ApiError::from_response(response));
    }
    if !response.has_body() {
        return Ok(Value::Null);
    }
    Ok(with_cache_tokens(response))
}

/// Succeeds for any status below 400.
///
/// # Errors
///
/// Returns the status-mapped [`ApiError`] for any status >= 400.
pub fn expect_success(response: &HttpResponse) -> Result<(), ApiError> {
    if response.code >= 400 {
        Err(ApiError::from_response(response))
    } else {
        Ok(())
    }
}

fn with_cache_tokens(response: &HttpResponse) -> Value {
    let mut body = response.body.clone();
    if let Value::Object(map) = &mut body {
        if let Some(etag) = response.etag() {
            map.insert(ETAG_KEY.to_string(), Value::String(etag.to_string()));
        }
        if let Some(last_modified) = response.last_modified() {
            map.insert(
                LAST_MODIFIED_KEY.to_string(),
                Value::String(last_modified.to_string()),
            );
        }
    }
    body
}
