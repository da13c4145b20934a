//! Issue comment resource implementation.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::clients::Transport;
use crate::rest::resources::User;
use crate::rest::{expect_json, expect_success, ApiError, Identity, Resource, ResourceCore};
use crate::RestClient;

/// A comment on an issue or pull request conversation.
///
/// Comments are identified by their numeric ID.
#[derive(Clone, Debug)]
pub struct IssueComment {
    core: ResourceCore,

    /// The numeric ID.
    pub id: u64,

    /// The comment text, in Markdown.
    pub body: String,

    /// The author.
    pub user: Option<User>,

    /// The web page of the comment.
    pub html_url: Option<String>,

    /// When the comment was posted.
    pub created_at: Option<DateTime<Utc>>,

    /// When the comment was last edited.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for IssueComment {
    const NAME: &'static str = "IssueComment";

    fn populate(core: ResourceCore) -> Result<Self, ApiError> {
        Ok(Self {
            id: core.required(Self::NAME, "id")?,
            body: core.optional("body").unwrap_or_default(),
            user: core.nested("user")?,
            html_url: core.optional("html_url"),
            created_at: core.timestamp("created_at"),
            updated_at: core.timestamp("updated_at"),
            core,
        })
    }

    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn identity(&self) -> Option<Identity> {
        (!self.is_null()).then_some(Identity::Id(self.id))
    }
}

crate::impl_resource_identity!(IssueComment);

impl IssueComment {
    fn self_link(&self) -> Result<&str, ApiError> {
        self.url().ok_or(ApiError::IncompleteResource {
            resource: Self::NAME,
            field: "url".to_string(),
        })
    }

    /// Replaces the comment text.
    ///
    /// # Errors
    ///
    /// Returns the status-mapped [`ApiError`]. On error the comment is left
    /// unchanged.
    pub async fn edit<T: Transport>(
        &mut self,
        client: &RestClient<T>,
        body: &str,
    ) -> Result<(), ApiError> {
        let response = client
            .patch(self.self_link()?, json!({ "body": body }))
            .await?;
        self.repopulate_from(expect_json(&response)?)
    }

    /// Deletes the comment.
    ///
    /// # Errors
    ///
    /// Returns the status-mapped [`ApiError`].
    pub async fn delete<T: Transport>(self, client: &RestClient<T>) -> Result<(), ApiError> {
        expect_success(&client.delete(self.self_link()?).await?)
    }
}
