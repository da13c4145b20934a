//! Parameter and date validation helpers.
//!
//! List operations take an integer item budget where `-1` means unbounded;
//! [`ItemBudget`] validates that integer once. The date helpers convert
//! between `chrono` timestamps and the two wire formats the API uses:
//! ISO-8601 (`2011-04-10T20:09:31Z`) in bodies and query parameters, and
//! HTTP-date (`Wed, 21 Oct 2015 07:28:00 GMT`) in caching headers.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::rest::ApiError;

/// The caller's maximum number of items for one traversal.
///
/// # Example
///
/// ```rust
/// use github_api::rest::ItemBudget;
///
/// assert_eq!(ItemBudget::from_count(-1).unwrap(), ItemBudget::Unbounded);
/// assert_eq!(ItemBudget::from_count(5).unwrap(), ItemBudget::Limited(5));
/// assert!(ItemBudget::from_count(-2).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemBudget {
    /// Fetch until the server stops returning pages.
    Unbounded,
    /// Yield at most this many items.
    Limited(usize),
}

impl ItemBudget {
    /// The integer sentinel meaning "no limit".
    pub const UNBOUNDED: i64 = -1;

    /// Validates an integer item count.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for negative values other than `-1`.
    pub fn from_count(count: i64) -> Result<Self, ApiError> {
        match count {
            Self::UNBOUNDED => Ok(Self::Unbounded),
            n if n >= 0 => usize::try_from(n)
                .map(Self::Limited)
                .map_err(|_| ApiError::InvalidParameter {
                    name: "count",
                    reason: format!("{n} does not fit in usize"),
                }),
            n => Err(ApiError::InvalidParameter {
                name: "count",
                reason: format!("expected -1 (unbounded) or a non-negative count, got {n}"),
            }),
        }
    }

    /// Returns the limit, or `None` when unbounded.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::Limited(n) => Some(*n),
        }
    }

    /// Returns the integer form (`-1` when unbounded).
    #[must_use]
    pub fn as_count(&self) -> i64 {
        match self {
            Self::Unbounded => Self::UNBOUNDED,
            Self::Limited(n) => i64::try_from(*n).unwrap_or(i64::MAX),
        }
    }
}

/// Checks that `value` is one of `allowed`.
///
/// # Errors
///
/// Returns [`ApiError::InvalidParameter`] naming the allowed values.
pub fn validate_one_of(name: &'static str, value: &str, allowed: &[&str]) -> Result<(), ApiError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ApiError::InvalidParameter {
            name,
            reason: format!("'{value}' is not one of {}", allowed.join(", ")),
        })
    }
}

/// Formats a timestamp the way the API expects in query parameters.
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses an ISO-8601 timestamp from a response body.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Formats a timestamp as an HTTP-date (for `If-Modified-Since`).
#[must_use]
pub fn format_http_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parses an HTTP-date (as found in `Last-Modified`).
#[must_use]
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `serialize_with` adapter for optional timestamps in parameter structs.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize_optional_timestamp<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(timestamp) => serializer.serialize_str(&format_timestamp(timestamp)),
        None => serializer.serialize_none(),
    }
}

/// Serializes a parameter struct into query parameters.
///
/// Null values are skipped, arrays are joined with commas.
///
/// # Errors
///
/// Returns [`ApiError::Serialization`] if `params` cannot be serialized, or
/// [`ApiError::UnprocessableResponseBody`] if it is not a struct/map.
pub fn to_query<T: Serialize>(params: &T) -> Result<HashMap<String, String>, ApiError> {
    let value = serde_json::to_value(params)?;

    let Value::Object(map) = value else {
        return Err(ApiError::UnprocessableResponseBody {
            expected: "an object of parameters",
            actual: crate::rest::json_type_name(&value),
        });
    };

    let mut query = HashMap::new();
    for (key, val) in map {
        match val {
            Value::Null => {}
            Value::String(s) => {
                query.insert(key, s);
            }
            Value::Number(n) => {
                query.insert(key, n.to_string());
            }
            Value::Bool(b) => {
                query.insert(key, b.to_string());
            }
            Value::Array(arr) => {
                let values: Vec<String> = arr
                    .iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect();
                if !values.is_empty() {
                    query.insert(key, values.join(","));
                }
            }
            Value::Object(_) => {
                query.insert(key, val.to_string());
            }
        }
    }

    Ok(query)
}
