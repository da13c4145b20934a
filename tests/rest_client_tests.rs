//! Integration tests for the REST client.
//!
//! These tests verify the headers sent with every request, rate limit
//! inspection and status-to-error mapping against a mock GitHub API.

use std::collections::HashMap;
use std::time::Duration;

use github_api::clients::SDK_VERSION;
use github_api::rest::ApiError;
use github_api::{AccessToken, BaseUrl, GithubConfig, HttpClient, RestClient};
use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> GithubConfig {
    GithubConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .access_token(AccessToken::new("ghp_test").unwrap())
        .user_agent_prefix("my-app/1.0")
        .build()
        .unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_rest_client_is_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
    assert_send_sync::<HttpClient>();
}

#[test]
fn test_build_url_encodes_segments() {
    let client = RestClient::new(GithubConfig::default()).unwrap();
    assert_eq!(
        client.build_url(&["repos", "octocat", "hello world"]),
        "repos/octocat/hello%20world"
    );
}

// ============================================================================
// Default Headers
// ============================================================================

#[tokio::test]
async fn test_requests_carry_default_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .and(header("Authorization", "Bearer ghp_test"))
        .and(header("Accept", "application/vnd.github+json"))
        .and(header("X-GitHub-Api-Version", "2022-11-28"))
        .and(header_exists("User-Agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "octocat",
            "id": 1,
            "url": "https://api.github.com/users/octocat"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = RestClient::new(config_for(&server)).unwrap();

    let response = client.get("users/octocat", None).await.unwrap();
    assert_eq!(response.code, 200);
}

#[tokio::test]
async fn test_user_agent_prefix_is_applied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zen"))
        .and(header(
            "User-Agent",
            format!("my-app/1.0 | github-api-rust/{SDK_VERSION}").as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("Keep it logically awesome."))
        .expect(1)
        .mount(&server)
        .await;
    let client = RestClient::new(config_for(&server)).unwrap();
    assert_eq!(client.get("zen", None).await.unwrap().code, 200);
}

#[tokio::test]
async fn test_caller_accept_header_replaces_default_regardless_of_case() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/Hello-World/readme"))
        .and(header("Accept", "application/vnd.github.raw+json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("# Hello World"))
        .expect(1)
        .mount(&server)
        .await;
    let client = RestClient::new(config_for(&server)).unwrap();

    let mut headers = HashMap::new();
    headers.insert(
        "accept".to_string(),
        "application/vnd.github.raw+json".to_string(),
    );
    let response = client
        .get_with_headers("repos/octocat/Hello-World/readme", None, &headers)
        .await
        .unwrap();
    assert_eq!(response.code, 200);
}

// ============================================================================
// Rate Limit
// ============================================================================

#[tokio::test]
async fn test_rate_limit_and_remaining() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": {
                "core": {"limit": 5000, "remaining": 4999, "reset": 1372700873, "used": 1},
                "search": {"limit": 30, "remaining": 18, "reset": 1372697452, "used": 12}
            },
            "rate": {"limit": 5000, "remaining": 4999, "reset": 1372700873, "used": 1}
        })))
        .expect(3)
        .mount(&server)
        .await;
    let client = RestClient::new(config_for(&server)).unwrap();

    let limits = client.rate_limit().await.unwrap();
    assert_eq!(limits.core().unwrap().limit, 5000);
    assert_eq!(limits.search().unwrap().used, 12);

    assert_eq!(client.remaining("search").await.unwrap(), 18);
    assert!(matches!(
        client.remaining("graphql").await,
        Err(ApiError::UnknownAttribute { .. })
    ));
}

// ============================================================================
// Error Mapping
// ============================================================================

#[tokio::test]
async fn test_validation_failure_carries_sub_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/octocat/Hello-World/issues"))
        .respond_with(
            ResponseTemplate::new(422)
                .insert_header("X-GitHub-Request-Id", "CAFE:1234")
                .set_body_json(json!({
                    "message": "Validation Failed",
                    "errors": [{"resource": "Issue", "field": "title", "code": "missing_field"}]
                })),
        )
        .mount(&server)
        .await;
    let client = RestClient::new(config_for(&server)).unwrap();

    let response = client
        .post("repos/octocat/Hello-World/issues", json!({"title": ""}))
        .await
        .unwrap();
    let error = github_api::rest::expect_json(&response).unwrap_err();

    assert_eq!(error.status(), Some(422));
    assert_eq!(error.request_id(), Some("CAFE:1234"));
    match error {
        ApiError::Unprocessable(details) => {
            assert_eq!(details.errors.len(), 1);
            assert!(details.to_string().contains("missing_field"));
        }
        other => panic!("expected Unprocessable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bad_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})))
        .mount(&server)
        .await;
    let client = RestClient::new(config_for(&server)).unwrap();

    let response = client.get("user", None).await.unwrap();
    assert!(matches!(
        github_api::rest::expect_json(&response),
        Err(ApiError::BadCredentials(_))
    ));
}

#[tokio::test]
async fn test_timeout_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;
    let config = GithubConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let client = RestClient::new(config).unwrap();

    assert!(matches!(
        client.get("slow", None).await,
        Err(ApiError::Transport(_))
    ));
}
