//! Integration tests for resources against a mock GitHub API.
//!
//! These tests verify construction from responses, conditional refresh,
//! boolean-status endpoints, lazy links and write operations over real HTTP.

use github_api::rest::resources::{IssueEdit, NewIssue, Repository, User};
use github_api::rest::{ApiError, Resource};
use github_api::{AccessToken, BaseUrl, GithubConfig, RestClient};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> RestClient {
    let config = GithubConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .access_token(AccessToken::new("ghp_test").unwrap())
        .build()
        .unwrap();
    RestClient::new(config).unwrap()
}

fn repo_json(server: &MockServer, name: &str) -> serde_json::Value {
    json!({
        "id": 1296269,
        "name": name,
        "full_name": format!("octocat/{name}"),
        "url": format!("{}/repos/octocat/Hello-World", server.uri()),
        "owner": {
            "login": "octocat",
            "id": 1,
            "url": format!("{}/users/octocat", server.uri())
        }
    })
}

async fn mount_repo(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/repos/octocat/Hello-World"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"abc\"")
                .insert_header("Last-Modified", "Tue, 15 Nov 1994 12:45:26 GMT")
                .set_body_json(repo_json(server, "Hello-World")),
        )
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Construction
// ============================================================================

#[tokio::test]
async fn test_fetch_captures_cache_tokens() {
    let server = MockServer::start().await;
    mount_repo(&server).await;
    let client = client_for(&server);

    let repo = Repository::get(&client, "octocat", "Hello-World").await.unwrap();
    assert_eq!(repo.full_name, "octocat/Hello-World");
    assert_eq!(repo.cache_tokens().etag.as_deref(), Some("\"abc\""));
    assert_eq!(
        repo.cache_tokens().last_modified.as_deref(),
        Some("Tue, 15 Nov 1994 12:45:26 GMT")
    );
    // tokens are not part of the public attributes
    assert_err!(repo.attr("__etag"));
    assert!(repo.as_value().get("__etag").is_none());
}

#[tokio::test]
async fn test_find_maps_not_found_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ghost-of-octocat"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;
    let client = client_for(&server);

    assert!(User::find(&client, "ghost-of-octocat").await.unwrap().is_none());
    assert!(matches!(
        User::get(&client, "ghost-of-octocat").await,
        Err(ApiError::NotFound(_))
    ));
}

// ============================================================================
// Refresh
// ============================================================================

#[tokio::test]
async fn test_refresh_replaces_state_and_keeps_identity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/Hello-World"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_json(&server, "x")))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let mut repo = Repository::from_json(repo_json(&server, "Hello-World")).unwrap();
    let before = repo.clone();

    repo.refresh(&client, false).await.unwrap();
    assert_eq!(repo.name, "x");
    assert_eq!(repo.attr("name").unwrap(), "x");
    assert_eq!(repo, before);
}

#[tokio::test]
async fn test_conditional_refresh_not_modified_leaves_resource_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/Hello-World"))
        .and(header_exists("If-Modified-Since"))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;
    mount_repo(&server).await;
    let client = client_for(&server);

    let mut repo = Repository::get(&client, "octocat", "Hello-World").await.unwrap();
    let raw = repo.as_value();

    let refreshed = repo.refresh(&client, true).await.unwrap();
    assert_eq!(refreshed.name, "Hello-World");
    assert_eq!(repo.as_value(), raw);
    assert_eq!(repo.cache_tokens().etag.as_deref(), Some("\"abc\""));
}

#[tokio::test]
async fn test_conditional_refresh_falls_back_to_etag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .and(header("If-None-Match", "\"abc\""))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let mut user = User::from_json(json!({
        "login": "octocat",
        "id": 1,
        "url": format!("{}/users/octocat", server.uri()),
        "__etag": "\"abc\""
    }))
    .unwrap();
    user.refresh(&client, true).await.unwrap();
    assert_eq!(user.login, "octocat");
}

#[tokio::test]
async fn test_refresh_error_leaves_resource_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/Hello-World"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({"message": "Bad Gateway"})))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let mut repo = Repository::from_json(repo_json(&server, "Hello-World")).unwrap();
    assert!(matches!(
        repo.refresh(&client, false).await,
        Err(ApiError::Server(_))
    ));
    assert_eq!(repo.name, "Hello-World");
}

// ============================================================================
// Endpoints
// ============================================================================

#[tokio::test]
async fn test_has_in_collaborators() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/Hello-World/collaborators/octocat"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/Hello-World/collaborators/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let client = client_for(&server);
    let repo = Repository::from_json(repo_json(&server, "Hello-World")).unwrap();

    assert!(repo.has_in_collaborators(&client, "octocat").await.unwrap());
    assert!(!repo.has_in_collaborators(&client, "ghost").await.unwrap());
}

#[tokio::test]
async fn test_issue_lifecycle() {
    let server = MockServer::start().await;
    let issue_url = format!("{}/repos/octocat/Hello-World/issues/1347", server.uri());
    let issue = |state: &str| {
        json!({
            "id": 1,
            "number": 1347,
            "title": "Found a bug",
            "state": state,
            "url": issue_url,
            "repository_url": format!("{}/repos/octocat/Hello-World", server.uri())
        })
    };

    Mock::given(method("POST"))
        .and(path("/repos/octocat/Hello-World/issues"))
        .and(body_json(json!({"title": "Found a bug", "labels": ["bug"]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(issue("open")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/repos/octocat/Hello-World/issues/1347"))
        .and(body_json(json!({"state": "closed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue("closed")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/repos/octocat/Hello-World/issues/1347/lock"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    mount_repo(&server).await;
    let client = client_for(&server);

    let repo = Repository::from_json(repo_json(&server, "Hello-World")).unwrap();
    let mut created = repo
        .create_issue(&client, &NewIssue::new("Found a bug").label("bug"))
        .await
        .unwrap();
    assert_eq!(created.state, "open");

    created
        .edit(
            &client,
            &IssueEdit {
                state: Some("closed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(created.state, "closed");

    assert_ok!(created.lock(&client, Some("resolved")).await);

    let parent = created.repository(&client).await.unwrap();
    assert_eq!(parent, repo);
}
