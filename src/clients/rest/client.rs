//! REST client implementation.
//!
//! This module provides the [`RestClient`] type: thin `get`/`post`/`patch`/
//! `put`/`delete` helpers that each perform exactly one transport call, plus
//! the entry points that turn responses into resources and paginated lists.

use std::collections::HashMap;

use serde_json::Value;

use crate::clients::rest::RateLimit;
use crate::clients::{
    HttpClient, HttpMethod, HttpRequest, HttpResponse, Transport, TransportError, ACCEPT_JSON,
};
use crate::config::GithubConfig;
use crate::rest::{
    expect_json, interpret_as_json, ApiError, ItemBudget, PaginatedList, Resource, UrlCache,
};

/// REST API client.
///
/// Generic over its [`Transport`] so tests and alternative HTTP stacks can be
/// injected; the default is the `reqwest`-backed [`HttpClient`].
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use github_api::{GithubConfig, RestClient};
/// use github_api::rest::resources::Repository;
///
/// let client = RestClient::new(GithubConfig::default())?;
/// let repo: Repository = client.fetch("repos/rust-lang/rust").await?;
///
/// let mut issues = repo.get_issues(&client, &Default::default(), 10)?;
/// while let Some(issue) = issues.next_item().await? {
///     println!("#{} {}", issue.number, issue.title);
/// }
/// ```
#[derive(Debug)]
pub struct RestClient<T: Transport = HttpClient> {
    transport: T,
    config: GithubConfig,
    url_cache: UrlCache,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient<HttpClient> {
    /// Creates a client backed by `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: GithubConfig) -> Result<Self, ApiError> {
        let transport = HttpClient::new(&config)?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> RestClient<T> {
    /// Creates a client over an arbitrary transport.
    #[must_use]
    pub fn with_transport(transport: T, config: GithubConfig) -> Self {
        tracing::debug!(
            base_url = %config.base_url(),
            api_version = %config.api_version(),
            "Creating GitHub REST client"
        );
        Self {
            transport,
            config,
            url_cache: UrlCache::new(),
        }
    }

    /// Returns the configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &GithubConfig {
        &self.config
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the URL cache shared by every call on this client.
    #[must_use]
    pub const fn url_cache(&self) -> &UrlCache {
        &self.url_cache
    }

    /// Builds a relative API path from raw segments, percent-encoding each.
    ///
    /// ```rust,ignore
    /// assert_eq!(client.build_url(&["repos", "octocat", "hello world"]),
    ///            "repos/octocat/hello%20world");
    /// ```
    #[must_use]
    pub fn build_url(&self, segments: &[&str]) -> String {
        self.url_cache.build(segments)
    }

    /// Sends a prepared request.
    ///
    /// An `Accept` header requesting the versioned JSON media type is added
    /// unless the request already carries one. Status codes are not
    /// interpreted here.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when no response was obtained.
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, ApiError> {
        if request.header("Accept").is_none() {
            request
                .extra_headers
                .get_or_insert_with(HashMap::new)
                .insert("Accept".to_string(), ACCEPT_JSON.to_string());
        }

        Ok(self.transport.send(&request).await?)
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when no response was obtained.
    pub async fn get(
        &self,
        url: &str,
        query: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, ApiError> {
        self.get_with_headers(url, query, &HashMap::new()).await
    }

    /// Sends a GET request with extra headers (conditional or content negotiation).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when no response was obtained.
    pub async fn get_with_headers(
        &self,
        url: &str,
        query: Option<HashMap<String, String>>,
        headers: &HashMap<String, String>,
    ) -> Result<HttpResponse, ApiError> {
        let request = HttpRequest::builder(HttpMethod::Get, url)
            .query(query)
            .headers(headers)
            .build()
            .map_err(TransportError::from)?;
        self.send(request).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when no response was obtained.
    pub async fn post(&self, url: &str, body: Value) -> Result<HttpResponse, ApiError> {
        self.make_request(HttpMethod::Post, url, Some(body)).await
    }

    /// Sends a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when no response was obtained.
    pub async fn patch(&self, url: &str, body: Value) -> Result<HttpResponse, ApiError> {
        self.make_request(HttpMethod::Patch, url, Some(body)).await
    }

    /// Sends a PUT request, with or without a body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when no response was obtained.
    pub async fn put(&self, url: &str, body: Option<Value>) -> Result<HttpResponse, ApiError> {
        self.make_request(HttpMethod::Put, url, body).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when no response was obtained.
    pub async fn delete(&self, url: &str) -> Result<HttpResponse, ApiError> {
        self.make_request(HttpMethod::Delete, url, None).await
    }

    async fn make_request(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<Value>,
    ) -> Result<HttpResponse, ApiError> {
        let mut builder = HttpRequest::builder(method, url);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let request = builder.build().map_err(TransportError::from)?;
        self.send(request).await
    }

    /// Fetches a single resource.
    ///
    /// # Errors
    ///
    /// Returns the status-mapped [`ApiError`] for any status >= 400, or the
    /// resource's construction error.
    pub async fn fetch<R: Resource>(&self, url: &str) -> Result<R, ApiError> {
        let response = self.get(url, None).await?;
        R::from_json(expect_json(&response)?)
    }

    /// Fetches a single resource, mapping 404 to `None`.
    ///
    /// # Errors
    ///
    /// Returns the status-mapped [`ApiError`] for any other status >= 400.
    pub async fn find<R: Resource>(&self, url: &str) -> Result<Option<R>, ApiError> {
        let response = self.get(url, None).await?;
        interpret_as_json(&response, 200)?
            .map(R::from_json)
            .transpose()
    }

    /// Starts a lazy traversal of a collection of resources.
    ///
    /// `count` is the item budget: `-1` for unbounded, otherwise the maximum
    /// number of items to yield. The configured `per_page` is added to the
    /// first request's parameters unless already present. No request is made
    /// until the first item is demanded.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for a negative `count` other
    /// than `-1`.
    pub fn paginate<R: Resource>(
        &self,
        url: &str,
        params: Option<HashMap<String, String>>,
        count: i64,
    ) -> Result<PaginatedList<'_, R, T>, ApiError> {
        self.paginate_with(url, params, count, R::from_json)
    }

    /// Like [`paginate`](Self::paginate), with an explicit item factory for
    /// collections whose items are not standalone resources.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for an invalid `count`.
    pub fn paginate_with<R>(
        &self,
        url: &str,
        params: Option<HashMap<String, String>>,
        count: i64,
        factory: fn(Value) -> Result<R, ApiError>,
    ) -> Result<PaginatedList<'_, R, T>, ApiError> {
        let budget = ItemBudget::from_count(count)?;

        let mut params = params.unwrap_or_default();
        if let Some(per_page) = self.config.per_page() {
            params
                .entry("per_page".to_string())
                .or_insert_with(|| per_page.to_string());
        }

        Ok(PaginatedList::new(self, url, Some(params), budget, factory))
    }

    /// Reads the current rate limit status.
    ///
    /// # Errors
    ///
    /// Returns the status-mapped [`ApiError`] on failure.
    pub async fn rate_limit(&self) -> Result<RateLimit, ApiError> {
        let response = self.get("rate_limit", None).await?;
        RateLimit::from_json(&expect_json(&response)?)
    }

    /// Returns `resources.<kind>.remaining` from the rate limit endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnknownAttribute`] if the API did not report `kind`.
    pub async fn remaining(&self, kind: &str) -> Result<u32, ApiError> {
        let limits = self.rate_limit().await?;
        limits
            .resource(kind)
            .map(|resource| resource.remaining)
            .ok_or_else(|| ApiError::UnknownAttribute {
                resource: "RateLimit",
                name: kind.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::testing::{response, scripted_client};
    use serde_json::json;

    #[tokio::test]
    async fn test_send_adds_accept_header() {
        let client = scripted_client(vec![response(200, &[], json!({}))]);
        client.get("user", None).await.unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests[0].header("accept"), Some(ACCEPT_JSON));
    }

    #[tokio::test]
    async fn test_send_keeps_caller_accept_header() {
        let client = scripted_client(vec![response(200, &[], json!({}))]);
        let mut headers = HashMap::new();
        headers.insert(
            "Accept".to_string(),
            "application/vnd.github.raw+json".to_string(),
        );
        client
            .get_with_headers("repos/o/r/readme", None, &headers)
            .await
            .unwrap();

        let requests = client.transport().requests();
        assert_eq!(
            requests[0].header("Accept"),
            Some("application/vnd.github.raw+json")
        );
    }

    #[tokio::test]
    async fn test_status_codes_are_not_interpreted_by_helpers() {
        let client = scripted_client(vec![response(500, &[], json!({"message": "boom"}))]);
        let response = client.delete("repos/o/r/issues/comments/1").await.unwrap();
        assert_eq!(response.code, 500);
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_transport_error() {
        let client = scripted_client(vec![]);
        let error = client.get("user", None).await.unwrap_err();
        assert!(matches!(error, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn test_put_may_omit_body() {
        let client = scripted_client(vec![response(204, &[], json!(null))]);
        let response = client.put("repos/o/r/issues/1/lock", None).await.unwrap();
        assert_eq!(response.code, 204);
        assert_eq!(
            client.transport().requests()[0].http_method,
            HttpMethod::Put
        );
    }

    #[test]
    fn test_paginate_rejects_invalid_count() {
        let client = scripted_client(vec![]);
        let result = client.paginate::<crate::rest::resources::User>("users", None, -3);
        assert!(matches!(
            result,
            Err(ApiError::InvalidParameter { name: "count", .. })
        ));
    }

    #[tokio::test]
    async fn test_paginate_adds_configured_per_page_to_first_request() {
        let config = GithubConfig::builder().per_page(50).build().unwrap();
        let client = RestClient::with_transport(
            crate::clients::testing::ScriptedTransport::new(vec![response(
                200,
                &[],
                json!([]),
            )]),
            config,
        );

        let mut list = client
            .paginate::<crate::rest::resources::User>("users", None, -1)
            .unwrap();
        assert!(list.next_item().await.unwrap().is_none());

        let query = client.transport().requests()[0].query.clone().unwrap();
        assert_eq!(query.get("per_page"), Some(&"50".to_string()));
    }

    #[tokio::test]
    async fn test_remaining_reads_requested_kind() {
        let client = scripted_client(vec![
            response(
                200,
                &[],
                json!({"resources": {"core": {"limit": 60, "remaining": 42, "reset": 0}}}),
            ),
            response(
                200,
                &[],
                json!({"resources": {"core": {"limit": 60, "remaining": 41, "reset": 0}}}),
            ),
        ]);

        assert_eq!(client.remaining("core").await.unwrap(), 42);
        assert!(matches!(
            client.remaining("search").await,
            Err(ApiError::UnknownAttribute { .. })
        ));
        assert_eq!(client.transport().requests()[0].url, "rate_limit");
    }

    #[tokio::test]
    async fn test_find_maps_404_to_none() {
        let client = scripted_client(vec![response(
            404,
            &[],
            json!({"message": "Not Found"}),
        )]);
        let user: Option<crate::rest::resources::User> = client.find("users/ghost").await.unwrap();
        assert!(user.is_none());
    }
}
