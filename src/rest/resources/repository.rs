//! Repository resource implementation.
//!
//! This module provides the [`Repository`] resource and [`LanguageShare`],
//! one entry of a repository's language breakdown.
//!
//! # Example
//!
//! ```rust,ignore
//! use github_api::rest::resources::{IssueListParams, NewIssue, Repository};
//!
//! let repo = Repository::get(&client, "octocat", "hello-world").await?;
//!
//! let params = IssueListParams {
//!     state: Some("closed".to_string()),
//!     labels: vec!["bug".to_string()],
//!     ..Default::default()
//! };
//! let closed_bugs = repo.get_issues(&client, &params, 20)?.collect_all().await?;
//!
//! let issue = repo.create_issue(&client, &NewIssue::new("Found a bug")).await?;
//!
//! if repo.has_in_collaborators(&client, "octocat").await? {
//!     println!("octocat can push");
//! }
//! ```

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::clients::Transport;
use crate::rest::params::to_query;
use crate::rest::resources::{Issue, IssueListParams, NewIssue, User};
use crate::rest::{
    expect_json, interpret_as_boolean, json_type_name, ApiError, PaginatedList, Resource,
    ResourceCore,
};
use crate::RestClient;

/// A repository.
#[derive(Clone, Debug)]
pub struct Repository {
    core: ResourceCore,

    /// The numeric ID.
    pub id: u64,

    /// The short name (`hello-world`).
    pub name: String,

    /// `owner/name`.
    pub full_name: String,

    /// The owning account.
    pub owner: Option<User>,

    /// Whether the repository is private.
    pub private: bool,

    /// Whether the repository is a fork.
    pub fork: bool,

    /// The description.
    pub description: Option<String>,

    /// The default branch.
    pub default_branch: Option<String>,

    /// Star count.
    pub stargazers_count: u64,

    /// Open issues and pull requests.
    pub open_issues_count: u64,

    /// Last push.
    pub pushed_at: Option<DateTime<Utc>>,

    /// Last update of the repository object.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Repository {
    const NAME: &'static str = "Repository";

    fn populate(core: ResourceCore) -> Result<Self, ApiError> {
        Ok(Self {
            id: core.required(Self::NAME, "id")?,
            name: core.required(Self::NAME, "name")?,
            full_name: core.required(Self::NAME, "full_name")?,
            owner: core.nested("owner")?,
            private: core.optional("private").unwrap_or(false),
            fork: core.optional("fork").unwrap_or(false),
            description: core.optional("description"),
            default_branch: core.optional("default_branch"),
            stargazers_count: core.optional("stargazers_count").unwrap_or(0),
            open_issues_count: core.optional("open_issues_count").unwrap_or(0),
            pushed_at: core.timestamp("pushed_at"),
            updated_at: core.timestamp("updated_at"),
            core,
        })
    }

    fn core(&self) -> &ResourceCore {
        &self.core
    }
}

crate::impl_resource_identity!(Repository);

impl Repository {
    /// Fetches `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the repository does not exist or is
    /// not visible to the caller.
    pub async fn get<T: Transport>(
        client: &RestClient<T>,
        owner: &str,
        repo: &str,
    ) -> Result<Self, ApiError> {
        client.fetch(&client.build_url(&["repos", owner, repo])).await
    }

    /// Builds `repos/{owner}/{name}/{tail...}`.
    fn path<T: Transport>(&self, client: &RestClient<T>, tail: &[&str]) -> String {
        let (owner, name) = self
            .full_name
            .split_once('/')
            .unwrap_or(("", self.name.as_str()));
        let mut segments = vec!["repos", owner, name];
        segments.extend_from_slice(tail);
        client.build_url(&segments)
    }

    /// Lists issues, filtered by `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] if `params` or `count` fail
    /// validation.
    pub fn get_issues<'c, T: Transport>(
        &self,
        client: &'c RestClient<T>,
        params: &IssueListParams,
        count: i64,
    ) -> Result<PaginatedList<'c, Issue, T>, ApiError> {
        params.validate()?;
        let query = to_query(params)?;
        client.paginate(&self.path(client, &["issues"]), Some(query), count)
    }

    /// Fetches one issue by number.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if there is no such issue.
    pub async fn get_issue<T: Transport>(
        &self,
        client: &RestClient<T>,
        number: u64,
    ) -> Result<Issue, ApiError> {
        let number = number.to_string();
        client.fetch(&self.path(client, &["issues", number.as_str()])).await
    }

    /// Opens an issue.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for an empty title, or
    /// [`ApiError::Unprocessable`] if the API rejects the payload.
    pub async fn create_issue<T: Transport>(
        &self,
        client: &RestClient<T>,
        issue: &NewIssue,
    ) -> Result<Issue, ApiError> {
        issue.validate()?;
        let body = serde_json::to_value(issue)?;
        let response = client.post(&self.path(client, &["issues"]), body).await?;
        Issue::from_json(expect_json(&response)?)
    }

    /// Lists the languages used, in bytes of code.
    ///
    /// The API returns a single object; each entry becomes one item.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for an invalid `count`.
    pub fn get_languages<'c, T: Transport>(
        &self,
        client: &'c RestClient<T>,
        count: i64,
    ) -> Result<PaginatedList<'c, LanguageShare, T>, ApiError> {
        client.paginate_with(
            &self.path(client, &["languages"]),
            None,
            count,
            LanguageShare::from_item,
        )
    }

    /// Whether `login` is a collaborator (204 yes, 404 no).
    ///
    /// # Errors
    ///
    /// Returns the status-mapped [`ApiError`] for any other status >= 400.
    pub async fn has_in_collaborators<T: Transport>(
        &self,
        client: &RestClient<T>,
        login: &str,
    ) -> Result<bool, ApiError> {
        let response = client
            .get(&self.path(client, &["collaborators", login]), None)
            .await?;
        interpret_as_boolean(&response, 204, 404)
    }
}

/// One language of a repository and how many bytes of it there are.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageShare {
    /// Language name as detected by GitHub.
    pub language: String,
    /// Bytes of code in that language.
    pub bytes: u64,
}

impl LanguageShare {
    /// Builds a share from a `[name, bytes]` page item.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnprocessableResponseBody`] for any other shape.
    pub fn from_item(item: Value) -> Result<Self, ApiError> {
        if let Value::Array(pair) = &item {
            if let [Value::String(language), bytes] = pair.as_slice() {
                if let Some(bytes) = bytes.as_u64() {
                    return Ok(Self {
                        language: language.clone(),
                        bytes,
                    });
                }
            }
        }
        Err(ApiError::UnprocessableResponseBody {
            expected: "a [language, bytes] pair",
            actual: json_type_name(&item),
        })
    }
}
