//! HTTP contract of `HttpProjectFetcher` against a mock API server.

use std::time::Duration;

use showcase_core::{FetchError, HttpProjectFetcher, ProjectListError, ProjectSource, ShowcaseConfig};

fn fetcher_for(server: &mockito::ServerGuard) -> HttpProjectFetcher {
    let config = ShowcaseConfig::new(&server.url())
        .unwrap()
        .with_request_timeout(Duration::from_secs(5))
        .unwrap();
    HttpProjectFetcher::new(&config).unwrap()
}

#[tokio::test]
async fn test_fetch_decodes_server_projects() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/projects")
        .match_header("cache-control", "no-store")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"id": 1, "slug": "showcase", "title": "Showcase", "summary": "Portfolio",
                 "tags": ["web"], "tech": ["Rust", "Tokio"],
                 "repoUrl": "https://github.com/csmntms/showcase", "demoUrl": null,
                 "createdUtc": "2025-10-23T19:40:19Z"},
                {"id": 2, "slug": "json-formatter", "title": "JSON Formatter", "summary": ""}
            ]"#,
        )
        .create_async()
        .await;

    let projects = fetcher_for(&server).fetch().await.unwrap();
    mock.assert_async().await;

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].slug, "showcase");
    assert_eq!(projects[0].tech, vec!["Rust", "Tokio"]);
    assert_eq!(
        projects[0].repo_url.as_deref(),
        Some("https://github.com/csmntms/showcase")
    );
    assert!(projects[1].tags.is_empty());
    assert!(projects[1].demo_url.is_none());
}

#[tokio::test]
async fn test_empty_array_is_success() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/projects")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let projects = fetcher_for(&server).fetch().await.unwrap();
    assert!(projects.is_empty());
}

#[tokio::test]
async fn test_server_error_is_status_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/projects")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let err = fetcher_for(&server).fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_non_200_success_is_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/projects")
        .with_status(204)
        .create_async()
        .await;

    let err = fetcher_for(&server).fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 204, .. }));
}

#[tokio::test]
async fn test_non_json_body_is_decode_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/projects")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = fetcher_for(&server).fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn test_object_body_is_decode_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/projects")
        .with_status(200)
        .with_body(r#"{"items": []}"#)
        .create_async()
        .await;

    let err = fetcher_for(&server).fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn test_duplicate_slug_is_invalid_payload() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/projects")
        .with_status(200)
        .with_body(
            r#"[{"slug": "a", "title": "A", "summary": ""},
                {"slug": "a", "title": "Again", "summary": ""}]"#,
        )
        .create_async()
        .await;

    let err = fetcher_for(&server).fetch().await.unwrap_err();
    assert_eq!(
        err,
        FetchError::InvalidPayload {
            url: format!("{}/projects", server.url()),
            reason: ProjectListError::DuplicateSlug {
                slug: "a".to_string()
            },
        }
    );
}

#[tokio::test]
async fn test_unreachable_host_is_transport_failure() {
    let config = ShowcaseConfig::new("http://127.0.0.1:1").unwrap();
    let fetcher = HttpProjectFetcher::new(&config).unwrap();

    let err = fetcher.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
    assert!(err.to_string().starts_with("request to http://127.0.0.1:1/projects failed"));
}

#[tokio::test]
async fn test_each_call_is_a_single_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/projects")
        .with_status(503)
        .expect(2)
        .create_async()
        .await;

    let fetcher = fetcher_for(&server);
    assert!(fetcher.fetch().await.is_err());
    assert!(fetcher.fetch().await.is_err());
    mock.assert_async().await;
}
