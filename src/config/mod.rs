//! Configuration types for the GitHub API client.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`GithubConfig`]: The configuration struct holding all client settings
//! - [`GithubConfigBuilder`]: A builder for constructing [`GithubConfig`] instances
//! - [`AccessToken`]: A validated access token with masked debug output
//! - [`BaseUrl`]: A validated API base URL
//! - [`ApiVersion`]: The REST API version to request
//!
//! # Example
//!
//! ```rust
//! use github_api::{GithubConfig, AccessToken, ApiVersion};
//!
//! let config = GithubConfig::builder()
//!     .access_token(AccessToken::new("ghp_token").unwrap())
//!     .api_version(ApiVersion::latest())
//!     .per_page(50)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.per_page(), Some(50));
//! ```

mod newtypes;
mod version;

pub use newtypes::{AccessToken, BaseUrl};
pub use version::ApiVersion;

use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for the GitHub API client.
///
/// # Thread Safety
///
/// `GithubConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct GithubConfig {
    base_url: BaseUrl,
    access_token: Option<AccessToken>,
    api_version: ApiVersion,
    user_agent_prefix: Option<String>,
    per_page: Option<u32>,
    timeout: Option<Duration>,
}

impl GithubConfig {
    /// Largest page size the API accepts.
    pub const MAX_PER_PAGE: u32 = 100;

    /// Creates a new builder for constructing a `GithubConfig`.
    #[must_use]
    pub fn builder() -> GithubConfigBuilder {
        GithubConfigBuilder::new()
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the access token, if configured.
    #[must_use]
    pub const fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the page size sent with the first request of every list.
    #[must_use]
    pub const fn per_page(&self) -> Option<u32> {
        self.per_page
    }

    /// Returns the per-request timeout applied by the transport.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            base_url: BaseUrl::default(),
            access_token: None,
            api_version: ApiVersion::latest(),
            user_agent_prefix: None,
            per_page: None,
            timeout: None,
        }
    }
}

// Verify GithubConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GithubConfig>();
};

/// Builder for constructing [`GithubConfig`] instances.
///
/// All fields are optional.
///
/// # Defaults
///
/// - `base_url`: `https://api.github.com`
/// - `access_token`: `None` (anonymous access)
/// - `api_version`: Latest known version
/// - `per_page`: `None` (server default, 30)
/// - `timeout`: `None`
#[derive(Debug, Default)]
pub struct GithubConfigBuilder {
    base_url: Option<BaseUrl>,
    access_token: Option<AccessToken>,
    api_version: Option<ApiVersion>,
    user_agent_prefix: Option<String>,
    per_page: Option<u32>,
    timeout: Option<Duration>,
}

impl GithubConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL (e.g. a GitHub Enterprise endpoint).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the access token used for the `Authorization` header.
    #[must_use]
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the page size requested from list endpoints.
    #[must_use]
    pub const fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the [`GithubConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPerPage`] if `per_page` is outside `1..=100`.
    pub fn build(self) -> Result<GithubConfig, ConfigError> {
        if let Some(per_page) = self.per_page {
            if per_page == 0 || per_page > GithubConfig::MAX_PER_PAGE {
                return Err(ConfigError::InvalidPerPage { per_page });
            }
        }

        Ok(GithubConfig {
            base_url: self.base_url.unwrap_or_default(),
            access_token: self.access_token,
            api_version: self.api_version.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
            per_page: self.per_page,
            timeout: self.timeout,
        })
    }
}
