//! # GitHub API Rust Client
//!
//! An async client for the GitHub REST API built around two ideas: resources
//! that carry their own cache tokens and can refresh themselves
//! conditionally, and lazy paginated lists that follow `Link` headers under
//! an item budget.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`GithubConfig`] and [`GithubConfigBuilder`]
//! - A pluggable [`Transport`] with a reqwest-backed default ([`HttpClient`])
//! - [`RestClient`] for requests, rate limit status and pagination
//! - The [`Resource`] trait: construction from JSON, identity-based
//!   equality, raw attribute fallback and conditional refresh
//! - [`PaginatedList`]: lazy, budgeted, restartable traversal
//! - Concrete resources in [`rest::resources`]
//!
//! ## Quick Start
//!
//! ```rust
//! use github_api::{AccessToken, ApiVersion, GithubConfig};
//!
//! let config = GithubConfig::builder()
//!     .access_token(AccessToken::new("ghp_token").unwrap())
//!     .api_version(ApiVersion::latest())
//!     .per_page(100)
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Pagination
//!
//! ```rust,ignore
//! use github_api::{GithubConfig, RestClient};
//! use github_api::rest::resources::User;
//!
//! let client = RestClient::new(GithubConfig::default())?;
//! let octocat = User::get(&client, "octocat").await?;
//!
//! // At most 10 repositories; pages are fetched only as needed
//! let mut repos = octocat.get_repos(&client, 10)?;
//! while let Some(repo) = repos.next_item().await? {
//!     println!("{}", repo.full_name);
//! }
//!
//! // Walk again from the first page; a 304 ends the list immediately
//! repos.restart(true);
//! ```
//!
//! ## Conditional Refresh
//!
//! ```rust,ignore
//! use github_api::rest::Resource;
//!
//! let mut repo = Repository::get(&client, "octocat", "hello-world").await?;
//! // Sends If-Modified-Since (or If-None-Match); unchanged resources cost
//! // no rate limit
//! repo.refresh(&client, true).await?;
//! ```
//!
//! ## Thread Safety
//!
//! Configuration, transport and client types are `Send + Sync`. A
//! [`PaginatedList`] borrows its client and is driven by one task at a time.

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{AccessToken, ApiVersion, BaseUrl, GithubConfig, GithubConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse, RestClient, Transport,
    TransportError,
};

// Re-export the resource core
pub use rest::{ApiError, PaginatedList, Resource};
