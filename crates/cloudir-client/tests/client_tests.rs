//! Integration tests for the directory API client using wiremock.
//!
//! Tests cover:
//! - Authentication and organization headers
//! - Raw request/response plumbing of `do_request`
//! - Error classification (404, "not found" messages, other failures)
//! - Paged listing for array and `results` page shapes

use cloudir_client::{ClientConfig, ClientError, DirectoryClient, Method, PAGE_LIMIT};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> DirectoryClient {
    let config = ClientConfig::new("test-api-key").with_api_url(server.uri());
    DirectoryClient::new(config).unwrap()
}

fn client_with_org(server: &MockServer) -> DirectoryClient {
    let config = ClientConfig::new("test-api-key")
        .with_api_url(format!("{}/", server.uri()))
        .with_org_id("org-42");
    DirectoryClient::new(config).unwrap()
}

// =============================================================================
// Headers
// =============================================================================

#[tokio::test]
async fn test_api_key_header_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/usergroups/g1"))
        .and(header("x-api-key", "test-api-key"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "g1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let group: Value = client.get_json("/api/v2/usergroups/g1").await.unwrap();
    assert_eq!(group["id"], "g1");
}

#[tokio::test]
async fn test_org_id_header_is_sent_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/systemusers/u1"))
        .and(header("x-org-id", "org-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "u1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_org(&server);
    assert_eq!(client.org_id(), Some("org-42"));
    let user: Value = client.get_json("/api/systemusers/u1").await.unwrap();
    assert_eq!(user["_id"], "u1");
}

// =============================================================================
// do_request
// =============================================================================

#[tokio::test]
async fn test_do_request_returns_raw_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/usergroups"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "engineering"})))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":"g9"}"#))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let body = serde_json::to_vec(&json!({"name": "engineering"})).unwrap();
    let bytes = client
        .do_request(Method::POST, "/api/v2/usergroups", &[], Some(body))
        .await
        .unwrap();

    assert_eq!(bytes, br#"{"id":"g9"}"#.to_vec());
}

#[tokio::test]
async fn test_do_request_empty_success_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/usergroups/g1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bytes = client
        .do_request(Method::DELETE, "/api/v2/usergroups/g1", &[], None)
        .await
        .unwrap();
    assert!(bytes.is_empty());
}

// =============================================================================
// Error classification
// =============================================================================

#[tokio::test]
async fn test_404_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/password-policies/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .get_json::<Value>("/api/v2/password-policies/missing")
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::NotFound(_)));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_400_with_not_found_message_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/usergroups/g1/members"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "group g1 not found"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .get_json::<Value>("/api/v2/usergroups/g1/members")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_server_error_is_propagated() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/mdm/config/m1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .put_json::<Value, _>("/api/v2/mdm/config/m1", &json!({"name": "fleet"}))
        .await
        .unwrap_err();

    assert!(!err.is_not_found());
    assert!(err.is_transient());
    assert_eq!(err.to_string(), "API error (status 500): internal failure");
}

#[tokio::test]
async fn test_invalid_json_success_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/systemusers/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .get_json::<Value>("/api/systemusers/u1")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    let config = ClientConfig::new("k")
        .with_api_url("http://127.0.0.1:9")
        .with_timeout_secs(2);
    let client = DirectoryClient::new(config).unwrap();

    let err = client.get_json::<Value>("/api/systemusers").await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
    assert!(err.is_transient());
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_list_all_v2_array_single_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/usergroups"))
        .and(query_param("filter", "name:eq:engineering"))
        .and(query_param("limit", "100"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "g1", "name": "engineering"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let groups: Vec<Value> = client
        .list_all("/api/v2/usergroups", Some("name:eq:engineering"))
        .await
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["id"], "g1");
}

#[tokio::test]
async fn test_list_all_follows_pages() {
    let server = MockServer::start().await;

    let first_page: Vec<Value> = (0..PAGE_LIMIT)
        .map(|i| json!({"_id": format!("u{i}")}))
        .collect();

    Mock::given(method("GET"))
        .and(path("/api/systemusers"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalCount": PAGE_LIMIT + 1,
            "results": first_page
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/systemusers"))
        .and(query_param("skip", PAGE_LIMIT.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalCount": PAGE_LIMIT + 1,
            "results": [{"_id": "last"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let users: Vec<Value> = client.list_all("/api/systemusers", None).await.unwrap();

    assert_eq!(users.len(), PAGE_LIMIT + 1);
    assert_eq!(users[PAGE_LIMIT]["_id"], "last");
}
