//! Rate limit status as reported by the `/rate_limit` endpoint.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::rest::{json_type_name, ApiError};

/// Quota for one resource kind (`core`, `search`, `graphql`, ...).
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RateLimitResource {
    /// Requests allowed per window.
    pub limit: u32,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Requests already made in the current window.
    #[serde(default)]
    pub used: u32,
    /// When the window resets.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub reset: DateTime<Utc>,
}

/// A snapshot of every quota the API reported.
///
/// This is a plain read: nothing is cached beyond the single call that
/// produced it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RateLimit {
    resources: HashMap<String, RateLimitResource>,
}

#[derive(Deserialize)]
struct RateLimitBody {
    resources: HashMap<String, RateLimitResource>,
}

impl RateLimit {
    /// Parses a `/rate_limit` response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnprocessableResponseBody`] if the body is not an
    /// object, or [`ApiError::Serialization`] if `resources` is malformed.
    pub fn from_json(body: &Value) -> Result<Self, ApiError> {
        if !body.is_object() {
            return Err(ApiError::UnprocessableResponseBody {
                expected: "a JSON object",
                actual: json_type_name(body),
            });
        }
        let parsed: RateLimitBody = serde_json::from_value(body.clone())?;
        Ok(Self {
            resources: parsed.resources,
        })
    }

    /// Returns the quota for `kind`, if the API reported one.
    #[must_use]
    pub fn resource(&self, kind: &str) -> Option<&RateLimitResource> {
        self.resources.get(kind)
    }

    /// The quota shared by most REST endpoints.
    #[must_use]
    pub fn core(&self) -> Option<&RateLimitResource> {
        self.resource("core")
    }

    /// The quota for search endpoints.
    #[must_use]
    pub fn search(&self) -> Option<&RateLimitResource> {
        self.resource("search")
    }

    /// The quota for the GraphQL endpoint.
    #[must_use]
    pub fn graphql(&self) -> Option<&RateLimitResource> {
        self.resource("graphql")
    }
}
