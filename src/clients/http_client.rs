//! HTTP transport for GitHub API communication.
//!
//! This module provides the [`Transport`] trait, the seam through which every
//! request leaves the crate, and [`HttpClient`], its `reqwest` implementation.

use std::collections::HashMap;

use crate::clients::errors::TransportError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::{BaseUrl, GithubConfig};

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Media type requested on every call.
pub const ACCEPT_JSON: &str = "application/vnd.github+json";

/// Executes one HTTP request and returns the normalized response.
///
/// Implementations must not interpret status codes: a 404 or 500 is a
/// successful transport round trip. Only failures to obtain a response at
/// all are errors. Implementations must not retry.
///
/// Tests and alternative HTTP stacks can supply their own implementation.
#[allow(async_fn_in_trait)]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the request is invalid or the network
    /// call fails before a status code is received.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `reqwest`-backed [`Transport`].
///
/// The client handles:
/// - URL resolution against the configured base URL
/// - Default headers (User-Agent, Accept, API version, Authorization)
/// - `Content-Type` for JSON bodies
/// - Response normalization into [`HttpResponse`]
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use github_api::{GithubConfig, HttpClient, HttpMethod, HttpRequest, Transport};
///
/// let client = HttpClient::new(&GithubConfig::default())?;
/// let request = HttpRequest::builder(HttpMethod::Get, "users/octocat").build()?;
/// let response = client.send(&request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: BaseUrl,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Build`] if the underlying `reqwest` client
    /// cannot be created (e.g. TLS initialization failure).
    pub fn new(config: &GithubConfig) -> Result<Self, TransportError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}github-api-rust/{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), ACCEPT_JSON.to_string());
        default_headers.insert(
            "X-GitHub-Api-Version".to_string(),
            config.api_version().to_string(),
        );

        if let Some(token) = config.access_token() {
            default_headers.insert(
                "Authorization".to_string(),
                format!("Bearer {}", token.as_ref()),
            );
        }

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TransportError::Build)?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            default_headers,
        })
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Parses response headers into a `HashMap` with lowercase keys.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Parses a response body: empty becomes `Null`, non-JSON stays raw text.
    fn parse_body(text: String) -> serde_json::Value {
        if text.trim().is_empty() {
            return serde_json::Value::Null;
        }
        serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
    }
}

impl Transport for HttpClient {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        request.verify()?;

        let url = self.base_url.join(&request.url);

        // keyed by lowercase name so a caller header replaces a default one
        let mut headers: HashMap<String, &str> = self
            .default_headers
            .iter()
            .map(|(key, value)| (key.to_ascii_lowercase(), value.as_str()))
            .collect();
        if request.body.is_some() {
            headers.insert("content-type".to_string(), "application/json");
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.to_ascii_lowercase(), value.as_str());
            }
        }

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Patch => self.client.patch(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in headers {
            req_builder = req_builder.header(key.as_str(), value);
        }

        if let Some(query) = &request.query {
            req_builder = req_builder.query(query);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        } else if request.http_method == HttpMethod::Put {
            // PUT without data must still announce a zero-length body
            req_builder = req_builder.header("Content-Length", "0");
        }

        let res = req_builder
            .send()
            .await
            .map_err(TransportError::from_reqwest)?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await.map_err(TransportError::from_reqwest)?;

        let response = HttpResponse::new(code, res_headers, Self::parse_body(body_text));

        tracing::debug!(
            method = %request.http_method,
            url = %url,
            status = code,
            "GitHub API request completed"
        );

        if let Some(deprecation) = response.header("deprecation") {
            tracing::warn!(
                url = %url,
                deprecation = deprecation,
                sunset = response.header("sunset").unwrap_or("unknown"),
                "Deprecated GitHub API endpoint"
            );
        }

        if let Some(limit) = response.rate_limit {
            if limit.remaining == 0 {
                tracing::warn!(
                    "GitHub API rate limit exhausted; resets at {}",
                    limit.reset
                );
            }
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccessToken, GithubConfig};
    use serde_json::json;

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&GithubConfig::default()).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("github-api-rust/"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = GithubConfig::builder()
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
    }

    #[test]
    fn test_accept_header_requests_versioned_media_type() {
        let client = HttpClient::new(&GithubConfig::default()).unwrap();

        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/vnd.github+json".to_string())
        );
        assert_eq!(
            client.default_headers().get("X-GitHub-Api-Version"),
            Some(&"2022-11-28".to_string())
        );
    }

    #[test]
    fn test_authorization_header_only_with_token() {
        let anonymous = HttpClient::new(&GithubConfig::default()).unwrap();
        assert!(anonymous.default_headers().get("Authorization").is_none());

        let config = GithubConfig::builder()
            .access_token(AccessToken::new("ghp_abc").unwrap())
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();
        assert_eq!(
            client.default_headers().get("Authorization"),
            Some(&"Bearer ghp_abc".to_string())
        );
    }

    #[test]
    fn test_parse_body_variants() {
        assert_eq!(HttpClient::parse_body(String::new()), json!(null));
        assert_eq!(HttpClient::parse_body("[1,2]".to_string()), json!([1, 2]));
        assert_eq!(
            HttpClient::parse_body("<html>".to_string()),
            json!("<html>")
        );
    }
}
