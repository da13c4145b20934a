//! REST client for the GitHub API.
//!
//! [`RestClient`] is the shared request helper every resource goes through.
//! It owns a [`Transport`](crate::clients::Transport), the configuration, and
//! the URL cache, and converts connectivity failures into
//! [`ApiError::Transport`](crate::rest::ApiError::Transport).
//!
//! # Example
//!
//! ```rust,ignore
//! use github_api::{GithubConfig, RestClient};
//!
//! let client = RestClient::new(GithubConfig::default())?;
//!
//! let response = client.get("users/octocat", None).await?;
//! println!("{}", response.body["login"]);
//!
//! let remaining = client.remaining("core").await?;
//! ```

mod client;
mod rate_limit;

pub use client::RestClient;
pub use rate_limit::{RateLimit, RateLimitResource};
