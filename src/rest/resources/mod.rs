//! Concrete GitHub resources.
//!
//! Each resource wraps one JSON object and exposes the fields every
//! representation of it carries as typed struct fields. Anything else the
//! API returned stays reachable through [`Resource::attr`](crate::rest::Resource::attr).
//!
//! # Available Resources
//!
//! | Resource | Identity | Entry points |
//! |----------|----------|--------------|
//! | [`User`] | API URL | [`User::get`], [`User::find`] |
//! | [`Repository`] | API URL | [`Repository::get`], [`User::get_repos`] |
//! | [`Issue`] | API URL | [`Repository::get_issue`], [`Repository::get_issues`], [`Issue::search`] |
//! | [`IssueComment`] | numeric ID | [`Issue::get_comments`], [`Issue::create_comment`] |
//!
//! Collections are returned as [`PaginatedList`](crate::rest::PaginatedList)s
//! and fetch nothing until the first item is demanded.

mod issue;
mod issue_comment;
mod repository;
mod user;

pub use issue::{Issue, IssueEdit, IssueListParams, NewIssue};
pub use issue_comment::IssueComment;
pub use repository::{LanguageShare, Repository};
pub use user::User;
