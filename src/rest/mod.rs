//! The resource core for the GitHub REST API.
//!
//! This module provides:
//!
//! - **[`Resource`] trait**: construction from JSON, wholesale repopulation,
//!   identity-based equality, raw attribute fallback, serialization and
//!   conditional refresh
//! - **[`ResourceCore`]**: the raw data, self link and cache tokens every
//!   resource shares
//! - **[`PaginatedList`]**: a lazy, budgeted, restartable traversal of a
//!   paginated collection
//! - **Response interpretation**: [`interpret_as_boolean`],
//!   [`interpret_as_json`], [`expect_json`]
//! - **[`ApiError`]**: one error per status code family
//! - **Parameters**: [`ItemBudget`], validators and date helpers
//! - **Paths**: [`build_path`] and the memoizing [`UrlCache`]
//!
//! Concrete resources live in [`resources`].
//!
//! # Example
//!
//! ```rust,ignore
//! use github_api::{GithubConfig, RestClient};
//! use github_api::rest::{ApiError, Resource};
//! use github_api::rest::resources::{Issue, Repository};
//!
//! let client = RestClient::new(GithubConfig::default())?;
//! let repo = Repository::get(&client, "octocat", "hello-world").await?;
//!
//! let mut issue = repo.get_issue(&client, 1347).await?;
//! println!("{}", issue.attr("author_association")?);
//!
//! // 304 if nothing changed; the issue is then left as it was
//! issue.refresh(&client, true).await?;
//! ```

mod errors;
pub mod pagination;
pub mod params;
mod path;
mod resource;
pub mod resources;
mod response;

pub use errors::{json_type_name, ApiError, StatusError};
pub use pagination::{ItemFactory, ListState, PaginatedList, ResponseMeta};
pub use params::{validate_one_of, ItemBudget};
pub use path::{build_path, encode_segment, UrlCache};
pub use resource::{CacheTokens, Identity, Resource, ResourceCore, ETAG_KEY, LAST_MODIFIED_KEY};
pub use response::{expect_json, expect_success, interpret_as_boolean, interpret_as_json};
