//! User resource implementation.
//!
//! This module provides the [`User`] resource: a GitHub account, either a
//! person or an organization. Users appear standalone (`GET /users/{login}`)
//! and embedded in other resources (issue authors, repository owners).
//!
//! # Example
//!
//! ```rust,ignore
//! use github_api::rest::resources::User;
//!
//! let octocat = User::get(&client, "octocat").await?;
//! println!("{} has {} public repos", octocat.login, octocat.attr("public_repos")?);
//!
//! let mut repos = octocat.get_repos(&client, -1)?;
//! while let Some(repo) = repos.next_item().await? {
//!     println!("{}", repo.full_name);
//! }
//! ```

use chrono::{DateTime, Utc};

use crate::clients::Transport;
use crate::rest::resources::Repository;
use crate::rest::{ApiError, PaginatedList, Resource, ResourceCore};
use crate::RestClient;

/// A GitHub account.
///
/// Only the fields shared by every user representation are typed; anything
/// else the API returned (e.g. `bio`, `followers`) is available through
/// [`Resource::attr`].
#[derive(Clone, Debug)]
pub struct User {
    core: ResourceCore,

    /// The account name.
    pub login: String,

    /// The numeric ID.
    pub id: u64,

    /// `"User"`, `"Organization"` or `"Bot"`.
    pub account_type: Option<String>,

    /// The display name (only present on full representations).
    pub name: Option<String>,

    /// The web page of the account.
    pub html_url: Option<String>,

    /// Whether the account is a GitHub staff member.
    pub site_admin: bool,

    /// When the account was created (only on full representations).
    pub created_at: Option<DateTime<Utc>>,
}

impl Resource for User {
    const NAME: &'static str = "User";

    fn populate(core: ResourceCore) -> Result<Self, ApiError> {
        Ok(Self {
            login: core.required(Self::NAME, "login")?,
            id: core.required(Self::NAME, "id")?,
            account_type: core.optional("type"),
            name: core.optional("name"),
            html_url: core.optional("html_url"),
            site_admin: core.optional("site_admin").unwrap_or(false),
            created_at: core.timestamp("created_at"),
            core,
        })
    }

    fn core(&self) -> &ResourceCore {
        &self.core
    }
}

crate::impl_resource_identity!(User);

impl User {
    /// Fetches a user by login.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no such account exists.
    pub async fn get<T: Transport>(client: &RestClient<T>, login: &str) -> Result<Self, ApiError> {
        client.fetch(&client.build_url(&["users", login])).await
    }

    /// Fetches a user by login, mapping 404 to `None`.
    ///
    /// # Errors
    ///
    /// Returns the status-mapped [`ApiError`] for statuses >= 400 other than 404.
    pub async fn find<T: Transport>(
        client: &RestClient<T>,
        login: &str,
    ) -> Result<Option<Self>, ApiError> {
        client.find(&client.build_url(&["users", login])).await
    }

    /// Lists this user's public repositories.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for an invalid `count`.
    pub fn get_repos<'c, T: Transport>(
        &self,
        client: &'c RestClient<T>,
        count: i64,
    ) -> Result<PaginatedList<'c, Repository, T>, ApiError> {
        client.paginate(&client.build_url(&["users", self.login.as_str(), "repos"]), None, count)
    }
}
