//! Lazy traversal of server-paginated collections.
//!
//! A [`PaginatedList`] follows the `rel="next"` links of a collection one
//! page at a time, performing at most one request per call to
//! [`next_item`](PaginatedList::next_item) and only when its page buffer is
//! empty. It enforces an item budget, remembers the `ETag` of the first page
//! of each traversal, and can be restarted (optionally conditionally, so an
//! unchanged collection costs one 304 and yields nothing).
//!
//! # States
//!
//! ```text
//! Fresh ──> FetchingPage ──> YieldingPage ──> Exhausted
//!                ^                │
//!                └────────────────┘  (buffer drained, next link, budget left)
//! ```
//!
//! `Exhausted` is terminal until [`restart`](PaginatedList::restart).
//!
//! # Example
//!
//! ```rust,ignore
//! use github_api::{GithubConfig, RestClient};
//! use github_api::rest::resources::Repository;
//!
//! let client = RestClient::new(GithubConfig::default())?;
//! let repo = Repository::get(&client, "rust-lang", "rust").await?;
//!
//! // At most 50 issues, however many pages that takes
//! let mut issues = repo.get_issues(&client, &Default::default(), 50)?;
//! while let Some(issue) = issues.next_item().await? {
//!     println!("#{} {}", issue.number, issue.title);
//! }
//!
//! // Later: costs one request, yields nothing if no issue changed
//! issues.restart(true);
//! while let Some(issue) = issues.next_item().await? {
//!     println!("changed: #{}", issue.number);
//! }
//! ```

use std::collections::{HashMap, VecDeque};

use serde_json::Value;

use crate::clients::{HttpClient, HttpResponse, RateLimitHeaders, Transport};
use crate::rest::{expect_json, json_type_name, ApiError, ItemBudget};
use crate::RestClient;

/// Builds one item from one raw page element.
pub type ItemFactory<R> = fn(Value) -> Result<R, ApiError>;

/// Where a traversal stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListState {
    /// No request made yet.
    Fresh,
    /// A page request is in flight.
    FetchingPage,
    /// Buffered items are being handed out.
    YieldingPage,
    /// No more items until restarted.
    Exhausted,
}

/// Status and headers of the most recent page request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, lowercased names.
    pub headers: HashMap<String, Vec<String>>,
    /// Parsed `X-RateLimit-*` headers.
    pub rate_limit: Option<RateLimitHeaders>,
}

impl ResponseMeta {
    fn from_response(response: &HttpResponse) -> Self {
        Self {
            status: response.code,
            headers: response.headers.clone(),
            rate_limit: response.rate_limit,
        }
    }

    /// Returns the first value of a header, matching case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// A restartable, budgeted, lazily fetched sequence of items.
///
/// Created by list-returning operations (see
/// [`RestClient::paginate`](crate::RestClient::paginate)). Items are yielded
/// in server order across pages with no reordering or deduplication.
pub struct PaginatedList<'c, R, T: Transport = HttpClient> {
    client: &'c RestClient<T>,
    factory: ItemFactory<R>,
    first_url: String,
    first_params: Option<HashMap<String, String>>,
    budget: ItemBudget,
    list_item: Option<String>,
    base_headers: HashMap<String, String>,
    initial_etag: Option<String>,

    state: ListState,
    remaining: Option<usize>,
    next_url: Option<String>,
    pending_params: Option<HashMap<String, String>>,
    outbound_etag: Option<String>,
    observed_etag: Option<String>,
    buffer: VecDeque<Value>,
    last_response: Option<ResponseMeta>,
    total_count: Option<u64>,
    pages_fetched: usize,
}

impl<'c, R, T: Transport> PaginatedList<'c, R, T> {
    /// Creates a list positioned before its first page. No request is made.
    #[must_use]
    pub fn new(
        client: &'c RestClient<T>,
        url: &str,
        params: Option<HashMap<String, String>>,
        budget: ItemBudget,
        factory: ItemFactory<R>,
    ) -> Self {
        let params = params.filter(|p| !p.is_empty());
        Self {
            client,
            factory,
            first_url: url.to_string(),
            first_params: params.clone(),
            budget,
            list_item: None,
            base_headers: HashMap::new(),
            initial_etag: None,
            state: ListState::Fresh,
            remaining: budget.limit(),
            next_url: Some(url.to_string()),
            pending_params: params,
            outbound_etag: None,
            observed_etag: None,
            buffer: VecDeque::new(),
            last_response: None,
            total_count: None,
            pages_fetched: 0,
        }
    }

    /// Adds static headers sent with every page request.
    #[must_use]
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.base_headers.extend(headers);
        self
    }

    /// Makes the first request conditional on `etag` (`If-None-Match`).
    ///
    /// A 304 (or a 404) answer then ends the traversal with no items.
    #[must_use]
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        let etag = etag.into();
        self.initial_etag = Some(etag.clone());
        self.outbound_etag = Some(etag);
        self
    }

    /// Reads page items from `key` of an object body (search results), and
    /// records the body's `total_count`.
    #[must_use]
    pub fn with_list_item(mut self, key: impl Into<String>) -> Self {
        self.list_item = Some(key.into());
        self
    }

    /// Yields the next item, fetching a page first if the buffer is empty.
    ///
    /// Returns `Ok(None)` once exhausted, and on every call after that.
    ///
    /// # Errors
    ///
    /// Returns the status-mapped [`ApiError`] if a page request answers with
    /// status >= 400 (the list is then exhausted), a transport error, or the
    /// item factory's error. A raw item the factory rejects is dropped: it
    /// does not count against the budget and the next call moves on to the
    /// following item.
    pub async fn next_item(&mut self) -> Result<Option<R>, ApiError> {
        loop {
            if self.remaining == Some(0) {
                self.exhaust();
                return Ok(None);
            }

            if let Some(raw) = self.buffer.pop_front() {
                let item = (self.factory)(raw)?;
                if let Some(remaining) = self.remaining.as_mut() {
                    *remaining -= 1;
                    if *remaining == 0 {
                        // the rest of this page is discarded
                        self.exhaust();
                        return Ok(Some(item));
                    }
                }
                if self.buffer.is_empty() && self.next_url.is_none() {
                    self.state = ListState::Exhausted;
                }
                return Ok(Some(item));
            }

            if self.state == ListState::Exhausted {
                return Ok(None);
            }

            let Some(url) = self.next_url.take() else {
                self.exhaust();
                return Ok(None);
            };
            self.fetch_page(&url).await?;
        }
    }

    /// Drains the remaining items into a `Vec`.
    ///
    /// # Errors
    ///
    /// Same as [`next_item`](Self::next_item); items yielded before the
    /// error are lost.
    pub async fn collect_all(&mut self) -> Result<Vec<R>, ApiError> {
        let mut items = Vec::new();
        while let Some(item) = self.next_item().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Rewinds to the first page with the full budget.
    ///
    /// With `conditional`, the first request of the new traversal carries the
    /// `ETag` observed on the previous traversal (or the one supplied with
    /// [`with_etag`](Self::with_etag)), so an unchanged collection ends the
    /// traversal immediately. The observed `ETag` is cleared either way so the
    /// new traversal captures its own.
    pub fn restart(&mut self, conditional: bool) {
        let observed = self.observed_etag.take();
        self.outbound_etag = if conditional {
            observed.or_else(|| self.initial_etag.clone())
        } else {
            self.initial_etag.clone()
        };

        self.state = ListState::Fresh;
        self.remaining = self.budget.limit();
        self.next_url = Some(self.first_url.clone());
        self.pending_params = self.first_params.clone();
        self.buffer.clear();
        self.total_count = None;
        self.pages_fetched = 0;
    }

    /// Fetches page `page` (1-based) directly.
    ///
    /// The cursor, budget and observed `ETag` are left untouched.
    ///
    /// # Errors
    ///
    /// Returns the status-mapped [`ApiError`] for statuses >= 400, or
    /// [`ApiError::UnprocessableResponseBody`] for a body that is not a list.
    pub async fn page(&self, page: u32) -> Result<Vec<R>, ApiError> {
        let mut params = self.first_params.clone().unwrap_or_default();
        params.insert("page".to_string(), page.to_string());

        let response = self
            .client
            .get_with_headers(&self.first_url, Some(params), &self.base_headers)
            .await?;
        if response.is_not_modified() {
            return Ok(Vec::new());
        }

        let (items, _) = extract_items(expect_json(&response)?, self.list_item.as_deref())?;
        items.into_iter().map(self.factory).collect()
    }

    async fn fetch_page(&mut self, url: &str) -> Result<(), ApiError> {
        self.state = ListState::FetchingPage;

        let mut headers = self.base_headers.clone();
        let conditional = self.pages_fetched == 0 && self.outbound_etag.is_some();
        if conditional {
            if let Some(etag) = &self.outbound_etag {
                headers.insert("If-None-Match".to_string(), etag.clone());
            }
        }
        let params = self.pending_params.take();

        let response = match self.client.get_with_headers(url, params, &headers).await {
            Ok(response) => response,
            Err(error) => {
                self.exhaust();
                return Err(error);
            }
        };
        self.pages_fetched += 1;
        self.last_response = Some(ResponseMeta::from_response(&response));

        if self.pages_fetched == 1 && self.observed_etag.is_none() {
            self.observed_etag = response.etag().map(ToString::to_string);
        }

        if response.is_not_modified() || (conditional && response.code == 404) {
            tracing::debug!(url = %url, status = response.code, "Collection not modified");
            // still current as of the ETag that was sent
            if self.observed_etag.is_none() {
                self.observed_etag.clone_from(&self.outbound_etag);
            }
            self.exhaust();
            return Ok(());
        }
        if response.code >= 400 {
            self.exhaust();
            return Err(ApiError::from_response(&response));
        }
        if !response.is_ok() || !response.has_body() {
            self.exhaust();
            return Ok(());
        }

        let next_url = response.next_url().map(ToString::to_string);
        let (items, total_count) = match extract_items(response.body, self.list_item.as_deref()) {
            Ok(extracted) => extracted,
            Err(error) => {
                self.exhaust();
                return Err(error);
            }
        };

        tracing::debug!(
            url = %url,
            page = self.pages_fetched,
            items = items.len(),
            has_next = next_url.is_some(),
            "Fetched page"
        );

        if total_count.is_some() {
            self.total_count = total_count;
        }
        self.next_url = next_url;
        self.buffer = items.into();
        self.state = ListState::YieldingPage;
        Ok(())
    }

    fn exhaust(&mut self) {
        self.state = ListState::Exhausted;
        self.next_url = None;
        self.buffer.clear();
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> ListState {
        self.state
    }

    /// Returns `true` once no further items will be produced.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state == ListState::Exhausted
    }

    /// The caller's budget as an integer (`-1` when unbounded).
    #[must_use]
    pub fn requested_count(&self) -> i64 {
        self.budget.as_count()
    }

    /// Items still allowed this traversal, `None` when unbounded.
    #[must_use]
    pub const fn remaining(&self) -> Option<usize> {
        self.remaining
    }

    /// The URL the next page request will go to.
    #[must_use]
    pub fn next_url(&self) -> Option<&str> {
        self.next_url.as_deref()
    }

    /// The `ETag` of the first page of the current traversal.
    #[must_use]
    pub fn observed_etag(&self) -> Option<&str> {
        self.observed_etag.as_deref()
    }

    /// Metadata of the most recent page request.
    #[must_use]
    pub const fn last_response(&self) -> Option<&ResponseMeta> {
        self.last_response.as_ref()
    }

    /// `total_count` of a search-shaped body, once a page has been fetched.
    #[must_use]
    pub const fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// Page requests made in the current traversal.
    #[must_use]
    pub const fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

impl<R, T: Transport> std::fmt::Debug for PaginatedList<'_, R, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedList")
            .field("first_url", &self.first_url)
            .field("state", &self.state)
            .field("remaining", &self.remaining)
            .field("next_url", &self.next_url)
            .field("buffered", &self.buffer.len())
            .field("pages_fetched", &self.pages_fetched)
            .finish_non_exhaustive()
    }
}

/// Splits a page body into raw items.
///
/// Arrays are taken as-is. Objects either hold the items under `list_item`
/// (with a `total_count`), or are a map whose entries each become one
/// `[key, value]` item.
fn extract_items(
    body: Value,
    list_item: Option<&str>,
) -> Result<(Vec<Value>, Option<u64>), ApiError> {
    match (body, list_item) {
        (Value::Array(items), _) => Ok((items, None)),
        (Value::Object(mut map), Some(key)) => {
            let total_count = map.get("total_count").and_then(Value::as_u64);
            match map.remove(key) {
                Some(Value::Array(items)) => Ok((items, total_count)),
                None | Some(Value::Null) => Ok((Vec::new(), total_count)),
                Some(other) => Err(ApiError::UnprocessableResponseBody {
                    expected: "an array of items",
                    actual: json_type_name(&other),
                }),
            }
        }
        (Value::Object(map), None) => Ok((
            map.into_iter()
                .map(|(key, value)| Value::Array(vec![Value::String(key), value]))
                .collect(),
            None,
        )),
        (Value::Null, _) => Ok((Vec::new(), None)),
        (other, _) => Err(ApiError::UnprocessableResponseBody {
            expected: "a JSON array or object",
            actual: json_type_name(&other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::testing::{next_link, response, scripted_client, ScriptedTransport};
    use serde_json::json;

    fn number(value: Value) -> Result<u64, ApiError> {
        value.as_u64().ok_or(ApiError::UnprocessableResponseBody {
            expected: "a number",
            actual: json_type_name(&value),
        })
    }

    fn page(items: Value, next: Option<&str>, etag: &str) -> HttpResponse {
        let link = next.map(next_link);
        let mut headers = vec![("ETag", etag)];
        if let Some(link) = &link {
            headers.push(("Link", link.as_str()));
        }
        response(200, &headers, items)
    }

    fn three_pages() -> Vec<HttpResponse> {
        vec![
            page(json!([1, 2]), Some("https://api.example.com/items?page=2"), "\"p1\""),
            page(json!([3, 4]), Some("https://api.example.com/items?page=3"), "\"p2\""),
            page(json!([5, 6]), None, "\"p3\""),
        ]
    }

    fn list(
        client: &RestClient<ScriptedTransport>,
        count: i64,
    ) -> PaginatedList<'_, u64, ScriptedTransport> {
        client
            .paginate_with("items", None, count, number)
            .unwrap()
    }

    #[tokio::test]
    async fn test_budget_stops_without_fetching_further_pages() {
        let client = scripted_client(three_pages());
        let mut items = list(&client, 4);

        assert_eq!(items.state(), ListState::Fresh);
        assert_eq!(items.collect_all().await.unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(client.transport().request_count(), 2);
        assert!(items.next_item().await.unwrap().is_none());
        assert!(items.is_exhausted());
    }

    #[tokio::test]
    async fn test_budget_yields_min_of_count_and_available() {
        for count in 0..=8 {
            let client = scripted_client(three_pages());
            let mut items = list(&client, count);
            let drained = items.collect_all().await.unwrap();

            let expected: Vec<u64> = (1..=6).take(usize::try_from(count).unwrap()).collect();
            assert_eq!(drained, expected, "count {count}");
            assert!(items.next_item().await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_zero_budget_makes_no_request() {
        let client = scripted_client(three_pages());
        let mut items = list(&client, 0);
        assert!(items.next_item().await.unwrap().is_none());
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_unbounded_follows_every_next_link_in_order() {
        let client = scripted_client(three_pages());
        let mut items = list(&client, -1);

        assert_eq!(items.collect_all().await.unwrap(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(items.pages_fetched(), 3);
        assert!(items.remaining().is_none());

        let urls: Vec<String> = client
            .transport()
            .requests()
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(
            urls,
            vec![
                "items",
                "https://api.example.com/items?page=2",
                "https://api.example.com/items?page=3"
            ]
        );
    }

    #[tokio::test]
    async fn test_one_request_per_page_and_only_on_empty_buffer() {
        let client = scripted_client(three_pages());
        let mut items = list(&client, -1);

        items.next_item().await.unwrap();
        assert_eq!(client.transport().request_count(), 1);
        assert_eq!(items.state(), ListState::YieldingPage);
        items.next_item().await.unwrap();
        assert_eq!(client.transport().request_count(), 1);
        items.next_item().await.unwrap();
        assert_eq!(client.transport().request_count(), 2);
    }

    #[tokio::test]
    async fn test_params_sent_only_on_first_request() {
        let client = scripted_client(three_pages());
        let mut params = HashMap::new();
        params.insert("state".to_string(), "open".to_string());
        let mut items = client
            .paginate_with("items", Some(params), -1, number)
            .unwrap();
        items.collect_all().await.unwrap();

        let requests = client.transport().requests();
        assert_eq!(
            requests[0].query.as_ref().unwrap().get("state"),
            Some(&"open".to_string())
        );
        assert!(requests[1].query.is_none());
        assert!(requests[2].query.is_none());
    }

    #[tokio::test]
    async fn test_error_on_second_page_exhausts_the_list() {
        let client = scripted_client(vec![
            page(json!([1, 2]), Some("https://api.example.com/items?page=2"), "\"p1\""),
            response(404, &[], json!({"message": "Not Found"})),
        ]);
        let mut items = list(&client, -1);

        assert_eq!(items.next_item().await.unwrap(), Some(1));
        assert_eq!(items.next_item().await.unwrap(), Some(2));
        assert!(matches!(items.next_item().await, Err(ApiError::NotFound(_))));
        assert!(items.is_exhausted());
        assert!(items.next_item().await.unwrap().is_none());
        assert_eq!(client.transport().request_count(), 2);
        assert_eq!(items.last_response().unwrap().status, 404);
    }

    #[tokio::test]
    async fn test_observed_etag_is_captured_once_per_traversal() {
        let client = scripted_client(three_pages());
        let mut items = list(&client, -1);

        items.collect_all().await.unwrap();
        assert_eq!(items.observed_etag(), Some("\"p1\""));
        assert_eq!(items.last_response().unwrap().header("etag"), Some("\"p3\""));
    }

    #[tokio::test]
    async fn test_restart_replays_the_same_sequence() {
        let mut responses = three_pages();
        responses.extend(three_pages());
        let client = scripted_client(responses);
        let mut items = list(&client, 5);

        let first = items.collect_all().await.unwrap();
        items.restart(false);
        assert_eq!(items.state(), ListState::Fresh);
        assert_eq!(items.remaining(), Some(5));
        let second = items.collect_all().await.unwrap();

        assert_eq!(first, second);
        let requests = client.transport().requests();
        assert!(requests.iter().all(|r| r.header("If-None-Match").is_none()));
    }

    #[tokio::test]
    async fn test_conditional_restart_sends_observed_etag_and_stops_on_304() {
        let mut responses = three_pages();
        responses.push(response(304, &[], Value::Null));
        let client = scripted_client(responses);
        let mut items = list(&client, -1);

        items.collect_all().await.unwrap();
        items.restart(true);
        assert!(items.observed_etag().is_none());
        assert!(items.next_item().await.unwrap().is_none());
        assert!(items.is_exhausted());

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[3].header("If-None-Match"), Some("\"p1\""));
        assert_eq!(requests[3].url, "items");
    }

    #[tokio::test]
    async fn test_conditional_404_is_treated_as_nothing_new() {
        let client = scripted_client(vec![response(404, &[], json!({"message": "Not Found"}))]);
        let mut items = list(&client, -1).with_etag("\"old\"");

        assert!(items.next_item().await.unwrap().is_none());
        assert_eq!(
            client.transport().requests()[0].header("If-None-Match"),
            Some("\"old\"")
        );
    }

    #[tokio::test]
    async fn test_conditional_header_only_on_first_page() {
        let client = scripted_client(three_pages());
        let mut items = list(&client, -1).with_etag("\"stale\"");
        items.collect_all().await.unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests[0].header("If-None-Match"), Some("\"stale\""));
        assert!(requests[1].header("If-None-Match").is_none());
    }

    #[tokio::test]
    async fn test_empty_body_ends_traversal() {
        let client = scripted_client(vec![response(200, &[], Value::Null)]);
        let mut items = list(&client, -1);
        assert!(items.next_item().await.unwrap().is_none());
        assert!(items.is_exhausted());
    }

    #[tokio::test]
    async fn test_object_body_entries_become_pairs() {
        let client = scripted_client(vec![response(
            200,
            &[],
            json!({"Rust": 1000, "Shell": 20}),
        )]);
        let mut items = client
            .paginate_with("languages", None, -1, Ok)
            .unwrap();

        let pairs = items.collect_all().await.unwrap();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&json!(["Rust", 1000])));
        assert!(pairs.contains(&json!(["Shell", 20])));
    }

    #[tokio::test]
    async fn test_list_item_reads_search_shaped_pages() {
        let client = scripted_client(vec![response(
            200,
            &[],
            json!({"total_count": 40, "incomplete_results": false, "items": [7, 8]}),
        )]);
        let mut items = list(&client, -1).with_list_item("items");

        assert_eq!(items.collect_all().await.unwrap(), vec![7, 8]);
        assert_eq!(items.total_count(), Some(40));
    }

    #[tokio::test]
    async fn test_direct_page_access_leaves_cursor_alone() {
        let client = scripted_client(vec![page(json!([3, 4]), None, "\"p2\"")]);
        let items = list(&client, -1);

        assert_eq!(items.page(2).await.unwrap(), vec![3, 4]);
        assert_eq!(items.state(), ListState::Fresh);
        assert_eq!(items.pages_fetched(), 0);
        let query = client.transport().requests()[0].query.clone().unwrap();
        assert_eq!(query.get("page"), Some(&"2".to_string()));
    }

    #[tokio::test]
    async fn test_factory_error_does_not_consume_budget() {
        let client = scripted_client(vec![page(json!(["x", 1]), None, "\"p1\"")]);
        let mut items = list(&client, 1);

        assert!(items.next_item().await.is_err());
        assert_eq!(items.remaining(), Some(1));
        assert_eq!(items.next_item().await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_repeated_conditional_restarts_keep_sending_etag() {
        let mut responses = three_pages();
        responses.push(response(304, &[("ETag", "\"p1\"")], Value::Null));
        responses.push(response(304, &[], Value::Null));
        let client = scripted_client(responses);
        let mut items = list(&client, -1);

        items.collect_all().await.unwrap();
        items.restart(true);
        assert!(items.next_item().await.unwrap().is_none());
        assert_eq!(items.observed_etag(), Some("\"p1\""));

        items.restart(true);
        assert!(items.next_item().await.unwrap().is_none());
        assert_eq!(items.observed_etag(), Some("\"p1\""));

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 5);
        assert_eq!(requests[3].header("If-None-Match"), Some("\"p1\""));
        assert_eq!(requests[4].header("If-None-Match"), Some("\"p1\""));
    }

    #[test]
    fn test_extract_items_rejects_scalars() {
        assert!(matches!(
            extract_items(json!("text"), None),
            Err(ApiError::UnprocessableResponseBody { actual: "string", .. })
        ));
    }
}
