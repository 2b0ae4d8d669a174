//! Shared fixtures for CLI integration tests: a mock directory API and a
//! scratch directory for manifests and state files.

#![allow(dead_code)]

use cloudir::manifest::Manifest;
use cloudir::state::StateFile;
use cloudir_client::{ClientConfig, DirectoryClient};
use cloudir_provider::Provider;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestContext {
    pub server: MockServer,
    pub dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn provider(&self) -> Provider {
        let config = ClientConfig::new("test-api-key")
            .with_api_url(self.server.uri())
            .with_org_id("org-test");
        Provider::with_client(DirectoryClient::new(config).expect("Failed to build client"))
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.path().join("cloudir.state.json")
    }

    pub fn load_state(&self) -> StateFile {
        StateFile::load(&self.state_path()).expect("Failed to load state")
    }

    pub fn manifest(&self, yaml: &str) -> Manifest {
        let manifest = Manifest::parse(yaml).expect("Invalid manifest");
        manifest.validate().expect("Invalid manifest");
        manifest
    }

    /// Methods of every request the mock received, as `METHOD /path`.
    pub async fn request_log(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| format!("{} {}", r.method, r.url.path()))
            .collect()
    }

    // =========================================================================
    // Mocks
    // =========================================================================

    pub async fn mock_create(&self, collection: &str, name: &str, response: Value) {
        Mock::given(method("POST"))
            .and(path(collection))
            .and(body_partial_json(serde_json::json!({"name": name})))
            .respond_with(ResponseTemplate::new(201).set_body_json(response))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_get(&self, object_path: &str, response: Value) {
        Mock::given(method("GET"))
            .and(path(object_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_status(&self, http_method: &str, object_path: &str, status: u16) {
        Mock::given(method(http_method))
            .and(path(object_path))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(serde_json::json!({"message": format!("status {status}")})),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mock_delete(&self, object_path: &str) {
        Mock::given(method("DELETE"))
            .and(path(object_path))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&self.server)
            .await;
    }
}
