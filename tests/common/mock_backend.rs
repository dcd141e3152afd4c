//! Mock campus backend for integration tests
//!
//! Wraps a wiremock server and builds a `CampusClient` pointed at it.

use std::sync::Arc;
use std::time::Duration;

use campus_connect::app::{CampusClient, Config, MemoryTokenStore, TokenStore};
use campus_connect::shared::AppConfig;
use serde_json::Value;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct MockBackend {
    pub server: MockServer,
}

impl MockBackend {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn config(&self) -> Config {
        Config::with_builder(AppConfig::builder().api_base_url(format!("{}/api", self.server.uri())))
            .expect("mock config")
    }

    /// Client over an in-memory token store, returned together with the store
    pub fn client(&self) -> (CampusClient, Arc<MemoryTokenStore>) {
        self.client_with(Arc::new(MemoryTokenStore::new()))
    }

    pub fn client_with(&self, storage: Arc<MemoryTokenStore>) -> (CampusClient, Arc<MemoryTokenStore>) {
        let dyn_storage: Arc<dyn TokenStore> = storage.clone();
        let client = CampusClient::with_storage(self.config(), dyn_storage).expect("mock client");
        (client, storage)
    }

    pub async fn respond(&self, verb: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(format!("/api{}", route)))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Respond only when the expected bearer token is attached
    pub async fn respond_for_token(&self, verb: &str, route: &str, token: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(format!("/api{}", route)))
            .and(header("authorization", format!("Bearer {}", token)))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn respond_delayed(&self, verb: &str, route: &str, status: u16, body: Value, delay: Duration) {
        Mock::given(method(verb))
            .and(path(format!("/api{}", route)))
            .respond_with(ResponseTemplate::new(status).set_body_json(body).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }
}
