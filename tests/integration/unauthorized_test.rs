//! The global 401 rule

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use campus_connect::app::session::StorageError;
use campus_connect::app::{CampusClient, MemoryTokenStore, Route, SessionStatus, StoredTokens, TokenStore};
use campus_connect::shared::{ApiError, Exam, ListQuery, TokenPair};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::assert_ok;
use crate::common::*;

/// Memory store that counts how often it was cleared
#[derive(Default)]
struct CountingStore {
    inner: MemoryTokenStore,
    clears: AtomicUsize,
}

impl CountingStore {
    fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenStore for CountingStore {
    async fn load(&self) -> Result<StoredTokens, StorageError> {
        self.inner.load().await
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        self.inner.save(tokens).await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear().await
    }
}

async fn signed_in_client(backend: &MockBackend) -> (CampusClient, Arc<CountingStore>) {
    let storage = Arc::new(CountingStore::default());
    let dyn_storage: Arc<dyn TokenStore> = storage.clone();
    let client = CampusClient::with_storage(backend.config(), dyn_storage).unwrap();
    client.bootstrap().await;
    client
        .session()
        .set_authenticated(identity(1, "alice", campus_connect::shared::Role::Student), tokens(ACCESS, REFRESH))
        .await
        .unwrap();
    (client, storage)
}

#[tokio::test]
async fn test_any_endpoint_401_clears_session() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/dashboard-stats/", 401, json!({"detail": "Token expired"})).await;
    let (client, storage) = signed_in_client(&backend).await;
    client.open_route(Route::Dashboard);

    let err = client.campus().dashboard_stats().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(client.session().status(), SessionStatus::Anonymous);
    assert_eq!(client.navigator().current(), Route::Login);
    assert_eq!(storage.clears(), 1);
    assert!(storage.inner.contents().is_empty());
}

#[tokio::test]
async fn test_concurrent_401s_clear_once() {
    let backend = MockBackend::start().await;
    backend
        .respond_delayed("GET", "/exams/", 401, json!({"detail": "Token expired"}), Duration::from_millis(100))
        .await;
    backend
        .respond_delayed("GET", "/events/", 401, json!({"detail": "Token expired"}), Duration::from_millis(100))
        .await;
    let (client, storage) = signed_in_client(&backend).await;
    let mut route_rx = client.navigator().subscribe();
    route_rx.borrow_and_update();

    let query = ListQuery::default();
    let (exams, events) = tokio::join!(
        client.campus().list::<Exam>(&query),
        client.api().get_json::<serde_json::Value>("/events/"),
    );

    assert!(matches!(exams, Err(ApiError::Unauthorized { .. })));
    assert!(matches!(events, Err(ApiError::Unauthorized { .. })));
    assert_eq!(storage.clears(), 1);
    assert_eq!(client.session().status(), SessionStatus::Anonymous);
    assert_eq!(*route_rx.borrow(), Route::Login);
}

#[tokio::test]
async fn test_stale_401_does_not_clear_new_session() {
    let backend = MockBackend::start().await;
    backend
        .respond_delayed("GET", "/results/", 401, json!({"detail": "Token expired"}), Duration::from_millis(200))
        .await;
    backend
        .respond(
            "POST",
            "/auth/login/",
            200,
            auth_body(user_json(1, "alice", campus_connect::shared::Role::Student), "A2", "R2"),
        )
        .await;
    let (client, storage) = signed_in_client(&backend).await;

    let old_request = {
        let client = client.clone();
        tokio::spawn(async move { client.api().get_json::<serde_json::Value>("/results/").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    client.auth().logout().await;
    assert_ok!(client.auth().login(&alice_credentials()).await);

    let result = old_request.await.unwrap();
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    assert_eq!(client.session().status(), SessionStatus::Authenticated);
    assert_eq!(client.session().access_token().as_deref(), Some("A2"));
    assert_eq!(storage.clears(), 1);
}

#[tokio::test]
async fn test_other_errors_leave_session_alone() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/exams/7/", 404, json!({"detail": "Not found."})).await;
    backend.respond("GET", "/events/7/", 500, json!("boom")).await;
    let (client, storage) = signed_in_client(&backend).await;

    let not_found = client.api().get_json::<serde_json::Value>("/exams/7/").await.unwrap_err();
    let server = client.api().get_json::<serde_json::Value>("/events/7/").await.unwrap_err();

    assert_eq!(not_found.user_message(), "Not found.");
    assert_eq!(server.user_message(), "boom");
    assert_eq!(client.session().status(), SessionStatus::Authenticated);
    assert_eq!(storage.clears(), 0);
}
