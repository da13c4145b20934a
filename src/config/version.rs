//! GitHub REST API version definitions.
//!
//! This module provides the [`ApiVersion`] enum, sent with every request in
//! the `X-GitHub-Api-Version` header.

use crate::error::ConfigError;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// GitHub REST API version.
///
/// GitHub names REST API versions by their release date. This enum provides
/// variants for known versions plus a `Custom` variant for dates released
/// after this crate was published.
///
/// # Example
///
/// ```rust
/// use github_api::ApiVersion;
///
/// let version: ApiVersion = "2022-11-28".parse().unwrap();
/// assert_eq!(version, ApiVersion::V2022_11_28);
/// assert_eq!(version.to_string(), "2022-11-28");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// API version 2022-11-28, the first date-named version.
    V2022_11_28,
    /// Custom version string for future or unrecognized versions.
    Custom(String),
}

impl ApiVersion {
    /// Returns the latest known API version.
    #[must_use]
    pub const fn latest() -> Self {
        Self::V2022_11_28
    }

    /// Returns `true` if this is a version known to this crate.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V2022_11_28 => f.write_str("2022-11-28"),
            Self::Custom(s) => f.write_str(s),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "2022-11-28" => Ok(Self::V2022_11_28),
            _ if s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() => {
                Ok(Self::Custom(s.to_string()))
            }
            _ => Err(ConfigError::InvalidApiVersion {
                version: s.to_string(),
            }),
        }
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::latest()
    }
}
