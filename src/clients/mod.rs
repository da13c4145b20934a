//! HTTP client types for GitHub API communication.
//!
//! This module provides the transport layer the resource core is built on.
//! It handles request validation, response normalization and GitHub-specific
//! header parsing. Status codes are never interpreted here.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`Transport`]: The seam through which every request is executed
//! - [`HttpClient`]: The `reqwest`-backed transport
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A normalized response (status, headers, body)
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PATCH, PUT, DELETE)
//! - [`rest::RestClient`]: Request helpers shared by every resource
//!
//! # Example
//!
//! ```rust,ignore
//! use github_api::{GithubConfig, HttpClient, HttpMethod, HttpRequest, Transport};
//!
//! let client = HttpClient::new(&GithubConfig::default())?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "repos/octocat/hello-world")
//!     .header("If-None-Match", "\"644b5b0155e6404a9cc4bd9d8b1ae730\"")
//!     .build()
//!     .unwrap();
//!
//! let response = client.send(&request).await?;
//! if response.is_not_modified() {
//!     println!("cached copy is current");
//! }
//! ```
//!
//! # Retry Behavior
//!
//! None. A timeout or connection failure is returned to the caller as a
//! [`TransportError`]; retry and backoff policy belong to the caller.

mod errors;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;

pub use errors::{InvalidHttpRequestError, TransportError};
pub use http_client::{HttpClient, Transport, ACCEPT_JSON, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{HttpResponse, LinkRelations, RateLimitHeaders};

pub use rest::{RateLimit, RateLimitResource, RestClient};
