//! Mock directory API using wiremock for provider integration tests.

#![allow(dead_code)]

use cloudir_client::{ClientConfig, DirectoryClient};
use cloudir_provider::{Provider, State};
use serde_json::Value;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_ORG_ID: &str = "org-test";

/// A wiremock server standing in for the directory API.
pub struct MockDirectory {
    server: MockServer,
}

impl MockDirectory {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    pub fn client(&self) -> DirectoryClient {
        let config = ClientConfig::new(TEST_API_KEY)
            .with_api_url(self.server.uri())
            .with_org_id(TEST_ORG_ID);
        DirectoryClient::new(config).unwrap()
    }

    pub fn provider(&self) -> Provider {
        Provider::with_client(self.client())
    }

    // =========================================================================
    // Object collections
    // =========================================================================

    /// `POST <collection>` answers with `response`.
    pub async fn mock_create(&self, collection: &str, response: Value) {
        Mock::given(method("POST"))
            .and(path(collection))
            .respond_with(ResponseTemplate::new(201).set_body_json(response))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// `POST <collection>` must carry `expected` (partial match).
    pub async fn mock_create_expecting(&self, collection: &str, expected: Value, response: Value) {
        Mock::given(method("POST"))
            .and(path(collection))
            .and(body_partial_json(expected))
            .respond_with(ResponseTemplate::new(201).set_body_json(response))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// `GET <collection>/<id>` answers with `response`.
    pub async fn mock_get(&self, object_path: &str, response: Value) {
        Mock::given(method("GET"))
            .and(path(object_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .mount(&self.server)
            .await;
    }

    /// Any `method` on `object_path` answers with `status` and a JSON message.
    pub async fn mock_status(&self, http_method: &str, object_path: &str, status: u16, message: &str) {
        Mock::given(method(http_method))
            .and(path(object_path))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(serde_json::json!({"message": message})),
            )
            .mount(&self.server)
            .await;
    }

    /// `<method> <object_path>` answers with `response`.
    pub async fn mock_update(&self, http_method: &str, object_path: &str, response: Value) {
        Mock::given(method(http_method))
            .and(path(object_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// `DELETE <object_path>` answers 204.
    pub async fn mock_delete(&self, object_path: &str) {
        Mock::given(method("DELETE"))
            .and(path(object_path))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Graph edge listing at `edges_path`.
    pub async fn mock_edges(&self, edges_path: &str, edges: Value) {
        Mock::given(method("GET"))
            .and(path(edges_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(edges))
            .mount(&self.server)
            .await;
    }

    /// Graph edge modification at `edges_path` with the given op.
    pub async fn mock_edge_op(&self, edges_path: &str, op: &str, target_id: &str) {
        Mock::given(method("POST"))
            .and(path(edges_path))
            .and(body_partial_json(serde_json::json!({"op": op, "id": target_id})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&self.server)
            .await;
    }
}

/// Build a state/config map from a JSON object literal.
pub fn attrs(value: Value) -> State {
    value.as_object().cloned().unwrap()
}

/// Remove the `id` attribute.
pub fn without_id(mut state: State) -> State {
    state.remove("id");
    state
}
