//! HTTP response types.
//!
//! This module provides the [`HttpResponse`] type, the normalized
//! `(status, headers, body)` triple every [`Transport`] returns, together
//! with parsers for the GitHub-specific headers the core relies on.
//!
//! [`Transport`]: crate::clients::Transport

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

/// Rate limit information parsed from the `X-RateLimit-*` headers.
///
/// # Example
///
/// ```rust
/// use github_api::clients::RateLimitHeaders;
///
/// let limit = RateLimitHeaders::parse("5000", "4987", "1372700873").unwrap();
/// assert_eq!(limit.limit, 5000);
/// assert_eq!(limit.remaining, 4987);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitHeaders {
    /// Maximum number of requests allowed in the current window.
    pub limit: u32,
    /// Requests remaining in the current window.
    pub remaining: u32,
    /// When the current window resets.
    pub reset: DateTime<Utc>,
}

impl RateLimitHeaders {
    /// Parses the three rate limit header values.
    ///
    /// Returns `None` if any value is missing or not numeric.
    #[must_use]
    pub fn parse(limit: &str, remaining: &str, reset: &str) -> Option<Self> {
        let limit = limit.trim().parse().ok()?;
        let remaining = remaining.trim().parse().ok()?;
        let reset = Utc
            .timestamp_opt(reset.trim().parse().ok()?, 0)
            .single()?;

        Some(Self {
            limit,
            remaining,
            reset,
        })
    }
}

/// Relations parsed from a `Link` header.
///
/// GitHub paginates with full URLs in the `Link` header, for example
/// `<https://api.github.com/repositories/1/issues?page=2>; rel="next"`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkRelations {
    /// URL of the next page, if any.
    pub next: Option<String>,
    /// URL of the previous page, if any.
    pub prev: Option<String>,
    /// URL of the first page, if any.
    pub first: Option<String>,
    /// URL of the last page, if any.
    pub last: Option<String>,
}

impl LinkRelations {
    /// Parses a `Link` header value.
    ///
    /// Unknown relations and malformed entries are ignored.
    #[must_use]
    pub fn parse_link_header(header_value: &str) -> Self {
        let mut result = Self::default();

        for link in header_value.split(',') {
            let mut parts = link.split(';');

            let url = parts
                .next()
                .map(str::trim)
                .filter(|s| s.starts_with('<') && s.ends_with('>'))
                .map(|s| s[1..s.len() - 1].to_string());

            let rel = parts.find_map(|part| {
                part.trim()
                    .strip_prefix("rel=")
                    .map(|rel| rel.trim_matches('"'))
            });

            if let (Some(url), Some(rel)) = (url, rel) {
                match rel {
                    "next" => result.next = Some(url),
                    "prev" | "previous" => result.prev = Some(url),
                    "first" => result.first = Some(url),
                    "last" => result.last = Some(url),
                    _ => {}
                }
            }
        }

        result
    }
}

/// An HTTP response from the API.
///
/// Header names are stored lowercased; every lookup helper is
/// case-insensitive. An empty body is represented as `Value::Null`, and a
/// body that is not valid JSON is kept as a `Value::String` of the raw text.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body.
    pub body: serde_json::Value,
    /// Relations from the `Link` header.
    pub links: LinkRelations,
    /// Rate limit information from the `X-RateLimit-*` headers.
    pub rate_limit: Option<RateLimitHeaders>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing `Link` and rate limit headers.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let headers: HashMap<String, Vec<String>> = headers
            .into_iter()
            .map(|(key, values)| (key.to_ascii_lowercase(), values))
            .collect();

        let first = |name: &str| headers.get(name).and_then(|values| values.first());

        let links = first("link").map_or_else(LinkRelations::default, |link| {
            LinkRelations::parse_link_header(link)
        });

        let rate_limit = match (
            first("x-ratelimit-limit"),
            first("x-ratelimit-remaining"),
            first("x-ratelimit-reset"),
        ) {
            (Some(limit), Some(remaining), Some(reset)) => {
                RateLimitHeaders::parse(limit, remaining, reset)
            }
            _ => None,
        };

        Self {
            code,
            headers,
            body,
            links,
            rate_limit,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` for the "unchanged since your cached copy" statuses.
    #[must_use]
    pub const fn is_not_modified(&self) -> bool {
        self.code == 304 || self.code == 305
    }

    /// Returns `true` if the response carries a non-empty body.
    #[must_use]
    pub fn has_body(&self) -> bool {
        match &self.body {
            serde_json::Value::Null => false,
            serde_json::Value::String(s) => !s.is_empty(),
            _ => true,
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

    /// Returns the `ETag` header value, if present.
    #[must_use]
    pub fn etag(&self) -> Option<&str> {
        self.header("etag")
    }

    /// Returns the `Last-Modified` header value, if present.
    #[must_use]
    pub fn last_modified(&self) -> Option<&str> {
        self.header("last-modified")
    }

    /// Returns the `X-GitHub-Request-Id` header value, if present.
    ///
    /// Include this ID when reporting API problems to GitHub.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-github-request-id")
    }

    /// Returns the URL of the next page, if the server declared one.
    #[must_use]
    pub fn next_url(&self) -> Option<&str> {
        self.links.next.as_deref()
    }
}
