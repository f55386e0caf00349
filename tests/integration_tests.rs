//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: client → HTTP requests → projects

use futures::TryStreamExt;
use resource_manager::{
    AuthConfig, Client, ClientConfig, Error, LifecycleState, ListOptions, ProjectFilter,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    Client::new(
        ClientConfig::builder()
            .base_url(server.uri())
            .auth(AuthConfig::bearer("test-token"))
            .timeout(Duration::from_secs(5))
            .build(),
    )
    .unwrap()
}

fn project(id: &str) -> serde_json::Value {
    json!({
        "projectId": id,
        "name": id.to_uppercase(),
        "projectNumber": "123",
        "lifecycleState": "ACTIVE"
    })
}

async fn mount_two_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1beta1/projects"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [project("c")]
        })))
        .with_priority(1)
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1beta1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [project("a"), project("b")],
            "nextPageToken": "page-2"
        })))
        .mount(server)
        .await;
}

// ============================================================================
// Listing Integration Tests
// ============================================================================

#[tokio::test]
async fn test_list_projects_follows_page_tokens() {
    let mock_server = MockServer::start().await;
    mount_two_pages(&mock_server).await;

    let client = client_for(&mock_server);
    let mut projects = client.list_projects(None, None).unwrap();

    let mut ids = Vec::new();
    while let Some(project) = projects.next().await.unwrap() {
        ids.push(project.project_id().to_string());
    }

    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(projects.page_number(), 2);
    assert_eq!(projects.num_results(), 3);
    assert!(projects.next_page_token().is_none());
}

#[tokio::test]
async fn test_list_projects_sends_filter_page_size_and_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta1/projects"))
        .and(query_param("filter", "labels.env:prod name:web"))
        .and(query_param("pageSize", "25"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [project("web")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let filter = ProjectFilter::new().label("env", "prod").name("web");
    let projects = client
        .list_projects(Some(&filter), Some(25))
        .unwrap()
        .collect_all()
        .await
        .unwrap();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].status(), Some(LifecycleState::Active));
}

#[tokio::test]
async fn test_list_projects_max_results_stops_fetching() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [project("a"), project("b")],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let projects = client
        .list_projects_with(None, None, ListOptions::new().max_results(2))
        .unwrap()
        .collect_all()
        .await
        .unwrap();

    assert_eq!(projects.len(), 2);
}

#[tokio::test]
async fn test_list_projects_as_stream() {
    let mock_server = MockServer::start().await;
    mount_two_pages(&mock_server).await;

    let client = client_for(&mock_server);
    let names: Vec<Option<String>> = client
        .list_projects(None, None)
        .unwrap()
        .into_stream()
        .map_ok(|project| project.name)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(
        names,
        vec![
            Some(String::from("A")),
            Some(String::from("B")),
            Some(String::from("C"))
        ]
    );
}

#[tokio::test]
async fn test_list_projects_server_error_surfaces() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta1/projects"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"code": 503, "message": "backend unavailable"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut projects = client.list_projects(None, None).unwrap();
    let err = projects.next().await.unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("backend unavailable"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ============================================================================
// Project Lifecycle Integration Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_missing_project() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta1/projects/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "Project not found"}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.fetch_project("missing").await.unwrap_err();
    assert!(err.is_not_found());

    let project = client.new_project("missing", None, None);
    assert!(!project.exists().await.unwrap());
}

#[tokio::test]
async fn test_project_lifecycle() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta1/projects"))
        .and(body_json(json!({
            "projectId": "life",
            "name": "Life",
            "labels": {"team": "infra"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projectId": "life",
            "name": "Life",
            "labels": {"team": "infra"},
            "projectNumber": "987",
            "lifecycleState": "ACTIVE"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v1beta1/projects/life"))
        .and(body_json(json!({"name": "Renamed", "labels": {"team": "infra"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projectId": "life",
            "name": "Renamed",
            "labels": {"team": "infra"},
            "projectNumber": "987",
            "lifecycleState": "ACTIVE"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v1beta1/projects/life"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1beta1/projects/life:undelete"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let labels = [("team".to_string(), "infra".to_string())].into();
    let mut project = client.new_project("life", Some("Life"), Some(labels));

    project.create().await.unwrap();
    assert_eq!(project.number(), Some("987"));
    assert_eq!(project.status(), Some(LifecycleState::Active));

    project.name = Some("Renamed".into());
    project.update().await.unwrap();
    assert_eq!(project.name.as_deref(), Some("Renamed"));

    project.delete(false).await.unwrap();
    project.undelete(false).await.unwrap();
}

#[tokio::test]
async fn test_api_key_auth_sent_as_query_param() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta1/projects/keyed"))
        .and(query_param("key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project("keyed")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(
        ClientConfig::builder()
            .base_url(mock_server.uri())
            .auth(AuthConfig::api_key("secret-key"))
            .build(),
    )
    .unwrap();

    let project = client.fetch_project("keyed").await.unwrap();
    assert_eq!(project.name.as_deref(), Some("KEYED"));
}
