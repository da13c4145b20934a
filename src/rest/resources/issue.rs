//! Issue resource implementation.
//!
//! This module provides the [`Issue`] resource together with the parameter
//! types for listing ([`IssueListParams`]), creating ([`NewIssue`]) and
//! editing ([`IssueEdit`]) issues.
//!
//! Pull requests are issues too: list endpoints return both, and
//! [`Issue::is_pull_request`] tells them apart.
//!
//! # Example
//!
//! ```rust,ignore
//! use github_api::rest::Resource;
//! use github_api::rest::resources::{Issue, IssueEdit};
//!
//! let mut issue = repo.get_issue(&client, 1347).await?;
//!
//! // Edits replace the whole local state with the server's answer
//! issue.edit(&client, &IssueEdit {
//!     state: Some("closed".to_string()),
//!     state_reason: Some("completed".to_string()),
//!     ..Default::default()
//! }).await?;
//!
//! // Follow the link back to the repository
//! let repo = issue.repository(&client).await?;
//!
//! // Search across GitHub
//! let mut hits = Issue::search(&client, "is:open label:bug language:rust", 100)?;
//! while let Some(hit) = hits.next_item().await? {
//!     println!("{}", hit.title);
//! }
//! println!("{:?} total", hits.total_count());
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::clients::Transport;
use crate::rest::params::{format_timestamp, serialize_optional_timestamp};
use crate::rest::resources::{IssueComment, Repository, User};
use crate::rest::{
    expect_json, expect_success, validate_one_of, ApiError, PaginatedList, Resource,
    ResourceCore,
};
use crate::RestClient;

const LOCK_REASONS: &[&str] = &["off-topic", "too heated", "resolved", "spam"];

/// An issue (or pull request seen through the issues API).
#[derive(Clone, Debug)]
pub struct Issue {
    core: ResourceCore,

    /// The numeric ID.
    pub id: u64,

    /// The number within the repository.
    pub number: u64,

    /// The title.
    pub title: String,

    /// `"open"` or `"closed"`.
    pub state: String,

    /// The description, in Markdown.
    pub body: Option<String>,

    /// The author.
    pub user: Option<User>,

    /// Label names.
    pub labels: Vec<String>,

    /// Number of comments.
    pub comments: u64,

    /// Whether the conversation is locked.
    pub locked: bool,

    /// Link to the repository this issue belongs to.
    pub repository_url: Option<String>,

    /// Link to this issue's comments.
    pub comments_url: Option<String>,

    /// The web page of the issue.
    pub html_url: Option<String>,

    /// Whether this is a pull request.
    pub is_pull_request: bool,

    /// When the issue was opened.
    pub created_at: Option<DateTime<Utc>>,

    /// When the issue was last updated.
    pub updated_at: Option<DateTime<Utc>>,

    /// When the issue was closed.
    pub closed_at: Option<DateTime<Utc>>,
}

impl Resource for Issue {
    const NAME: &'static str = "Issue";

    fn populate(core: ResourceCore) -> Result<Self, ApiError> {
        let labels = core
            .get("labels")
            .and_then(Value::as_array)
            .map(|labels| {
                labels
                    .iter()
                    .filter_map(|label| match label {
                        Value::String(name) => Some(name.clone()),
                        Value::Object(map) => map
                            .get("name")
                            .and_then(Value::as_str)
                            .map(ToString::to_string),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            id: core.required(Self::NAME, "id")?,
            number: core.required(Self::NAME, "number")?,
            title: core.required(Self::NAME, "title")?,
            state: core.required(Self::NAME, "state")?,
            body: core.optional("body"),
            user: core.nested("user")?,
            labels,
            comments: core.optional("comments").unwrap_or(0),
            locked: core.optional("locked").unwrap_or(false),
            repository_url: core.optional("repository_url"),
            comments_url: core.optional("comments_url"),
            html_url: core.optional("html_url"),
            is_pull_request: core.get("pull_request").is_some(),
            created_at: core.timestamp("created_at"),
            updated_at: core.timestamp("updated_at"),
            closed_at: core.timestamp("closed_at"),
            core,
        })
    }

    fn core(&self) -> &ResourceCore {
        &self.core
    }
}

crate::impl_resource_identity!(Issue);

impl Issue {
    fn self_link(&self) -> Result<&str, ApiError> {
        self.url().ok_or(ApiError::IncompleteResource {
            resource: Self::NAME,
            field: "url".to_string(),
        })
    }

    /// Searches issues and pull requests.
    ///
    /// `query` uses GitHub search syntax (`repo:o/r is:open label:bug`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for an empty query or invalid
    /// `count`.
    pub fn search<'c, T: Transport>(
        client: &'c RestClient<T>,
        query: &str,
        count: i64,
    ) -> Result<PaginatedList<'c, Self, T>, ApiError> {
        if query.trim().is_empty() {
            return Err(ApiError::InvalidParameter {
                name: "query",
                reason: "search query must not be empty".to_string(),
            });
        }
        let mut params = HashMap::new();
        params.insert("q".to_string(), query.to_string());
        Ok(client
            .paginate(&client.build_url(&["search", "issues"]), Some(params), count)?
            .with_list_item("items"))
    }

    /// Applies `changes` and replaces this issue's state with the result.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for invalid values, or the
    /// status-mapped [`ApiError`]. On error the issue is left unchanged.
    pub async fn edit<T: Transport>(
        &mut self,
        client: &RestClient<T>,
        changes: &IssueEdit,
    ) -> Result<(), ApiError> {
        changes.validate()?;
        let body = serde_json::to_value(changes)?;
        let response = client.patch(self.self_link()?, body).await?;
        self.repopulate_from(expect_json(&response)?)
    }

    /// Lists comments, optionally only those updated after `since`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for an invalid `count`.
    pub fn get_comments<'c, T: Transport>(
        &self,
        client: &'c RestClient<T>,
        since: Option<DateTime<Utc>>,
        count: i64,
    ) -> Result<PaginatedList<'c, IssueComment, T>, ApiError> {
        let url = self.comments_link()?;
        let params = since.map(|since| {
            let mut params = HashMap::new();
            params.insert("since".to_string(), format_timestamp(&since));
            params
        });
        client.paginate(&url, params, count)
    }

    /// Adds a comment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for an empty body, or the
    /// status-mapped [`ApiError`].
    pub async fn create_comment<T: Transport>(
        &self,
        client: &RestClient<T>,
        body: &str,
    ) -> Result<IssueComment, ApiError> {
        if body.trim().is_empty() {
            return Err(ApiError::InvalidParameter {
                name: "body",
                reason: "comment body must not be empty".to_string(),
            });
        }
        let response = client
            .post(&self.comments_link()?, json!({ "body": body }))
            .await?;
        IssueComment::from_json(expect_json(&response)?)
    }

    /// Fetches the repository this issue belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::IncompleteResource`] if the issue carries no
    /// `repository_url`, or the status-mapped [`ApiError`].
    pub async fn repository<T: Transport>(
        &self,
        client: &RestClient<T>,
    ) -> Result<Repository, ApiError> {
        let url = self
            .repository_url
            .as_deref()
            .ok_or(ApiError::IncompleteResource {
                resource: Self::NAME,
                field: "repository_url".to_string(),
            })?;
        client.fetch(url).await
    }

    /// Locks the conversation.
    ///
    /// `reason` must be one of `off-topic`, `too heated`, `resolved`, `spam`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for an unknown reason, or the
    /// status-mapped [`ApiError`].
    pub async fn lock<T: Transport>(
        &self,
        client: &RestClient<T>,
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        if let Some(reason) = reason {
            validate_one_of("lock_reason", reason, LOCK_REASONS)?;
        }
        let url = format!("{}/lock", self.self_link()?);
        let body = reason.map(|reason| json!({ "lock_reason": reason }));
        expect_success(&client.put(&url, body).await?)
    }

    /// Unlocks the conversation.
    ///
    /// # Errors
    ///
    /// Returns the status-mapped [`ApiError`].
    pub async fn unlock<T: Transport>(&self, client: &RestClient<T>) -> Result<(), ApiError> {
        let url = format!("{}/lock", self.self_link()?);
        expect_success(&client.delete(&url).await?)
    }

    fn comments_link(&self) -> Result<String, ApiError> {
        match &self.comments_url {
            Some(url) => Ok(url.clone()),
            None => Ok(format!("{}/comments", self.self_link()?)),
        }
    }
}

/// Filters for listing a repository's issues.
#[derive(Clone, Debug, Default, Serialize)]
pub struct IssueListParams {
    /// `open` (default), `closed` or `all`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Only issues carrying every one of these labels.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    /// `created` (default), `updated` or `comments`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,

    /// `asc` or `desc` (default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,

    /// Only issues updated at or after this time.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_timestamp"
    )]
    pub since: Option<DateTime<Utc>>,

    /// Login of the assignee, `none` or `*`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// Login of the author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    /// Milestone number, `none` or `*`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
}

impl IssueListParams {
    /// Checks enumerated values.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(state) = &self.state {
            validate_one_of("state", state, &["open", "closed", "all"])?;
        }
        if let Some(sort) = &self.sort {
            validate_one_of("sort", sort, &["created", "updated", "comments"])?;
        }
        if let Some(direction) = &self.direction {
            validate_one_of("direction", direction, &["asc", "desc"])?;
        }
        Ok(())
    }
}

/// Fields for a new issue.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NewIssue {
    /// The title (required).
    pub title: String,

    /// The description, in Markdown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Label names to apply.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    /// Logins to assign.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
}

impl NewIssue {
    /// Creates a new issue payload with just a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Checks that the title is not blank.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for an empty title.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::InvalidParameter {
                name: "title",
                reason: "issue title must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Changes to apply to an issue. Unset fields are left as they are.
#[derive(Clone, Debug, Default, Serialize)]
pub struct IssueEdit {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// `open` or `closed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// `completed`, `not_planned` or `reopened`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_reason: Option<String>,

    /// Replaces every label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,

    /// Replaces every assignee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
}

impl IssueEdit {
    /// Checks enumerated values.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(state) = &self.state {
            validate_one_of("state", state, &["open", "closed"])?;
        }
        if let Some(reason) = &self.state_reason {
            validate_one_of("state_reason", reason, &["completed", "not_planned", "reopened"])?;
        }
        Ok(())
    }
}
