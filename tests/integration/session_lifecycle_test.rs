//! Login, registration, logout and startup verification

use std::sync::Arc;
use std::time::Duration;

use campus_connect::app::{GuardDecision, MemoryTokenStore, Route, SessionStatus};
use campus_connect::shared::{ErrorKind, Event, ListQuery, RegistrationData, Role};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::*;
use crate::{assert_ok, assert_signed_out};

#[tokio::test]
async fn test_login_scenario() {
    let backend = MockBackend::start().await;
    backend.respond("POST", "/auth/login/", 200, alice_auth_body()).await;
    let (client, storage) = backend.client();
    client.bootstrap().await;

    let identity = assert_ok!(client.auth().login(&alice_credentials()).await);

    assert_eq!(identity.role, Role::Student);
    assert_eq!(client.session().status(), SessionStatus::Authenticated);
    assert_eq!(client.session().identity().map(|i| i.role), Some(Role::Student));
    assert_eq!(storage.contents(), stored(ACCESS, REFRESH));
}

#[tokio::test]
async fn test_protected_request_carries_bearer() {
    let backend = MockBackend::start().await;
    backend.respond("POST", "/auth/login/", 200, alice_auth_body()).await;
    backend
        .respond_for_token("GET", "/events/", ACCESS, 200, json!({"count": 0, "results": []}))
        .await;
    let (client, _storage) = backend.client();
    client.bootstrap().await;
    assert_ok!(client.auth().login(&alice_credentials()).await);

    let page = assert_ok!(client.campus().list::<Event>(&ListQuery::default()).await);
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_login_then_logout_leaves_nothing() {
    let backend = MockBackend::start().await;
    backend.respond("POST", "/auth/login/", 200, alice_auth_body()).await;
    let (client, storage) = backend.client();
    client.bootstrap().await;

    for _ in 0..3 {
        assert_ok!(client.auth().login(&alice_credentials()).await);
        client.auth().logout().await;
        assert_signed_out!(client, storage);
    }
}

#[tokio::test]
async fn test_bootstrap_without_token_makes_no_request() {
    let backend = MockBackend::start().await;
    let (client, _storage) = backend.client();

    assert_eq!(client.bootstrap().await, SessionStatus::Anonymous);
    assert_eq!(backend.request_count().await, 0);
}

#[tokio::test]
async fn test_bootstrap_restores_session() {
    let backend = MockBackend::start().await;
    backend
        .respond_for_token("GET", "/auth/profile/", "stored-access", 200, user_json(4, "grace", Role::Faculty))
        .await;
    let (client, _storage) = backend.client_with(Arc::new(MemoryTokenStore::with_tokens(stored(
        "stored-access",
        "stored-refresh",
    ))));

    assert_eq!(client.bootstrap().await, SessionStatus::Authenticated);
    let session = client.session().snapshot();
    assert_eq!(session.identity().map(|i| i.username.as_str()), Some("grace"));
    assert_eq!(session.refresh_token(), Some("stored-refresh"));
}

#[tokio::test]
async fn test_bootstrap_with_rejected_token_purges_it() {
    let backend = MockBackend::start().await;
    backend
        .respond("GET", "/auth/profile/", 401, json!({"detail": "Given token not valid for any token type"}))
        .await;
    let (client, storage) = backend.client_with(Arc::new(MemoryTokenStore::with_tokens(stored("old", "old-r"))));

    assert_eq!(client.bootstrap().await, SessionStatus::Anonymous);
    assert_signed_out!(client, storage);
}

#[tokio::test]
async fn test_bootstrap_with_unreachable_backend_purges_token() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/auth/profile/", 502, json!("Bad gateway")).await;
    let (client, storage) = backend.client_with(Arc::new(MemoryTokenStore::with_tokens(stored("old", "old-r"))));

    assert_eq!(client.bootstrap().await, SessionStatus::Anonymous);
    assert_signed_out!(client, storage);
}

#[tokio::test]
async fn test_guard_waits_then_admits_restored_session() {
    let backend = MockBackend::start().await;
    backend
        .respond_delayed(
            "GET",
            "/auth/profile/",
            200,
            user_json(9, "root", Role::Admin),
            Duration::from_millis(100),
        )
        .await;
    let (client, _storage) = backend.client_with(Arc::new(MemoryTokenStore::with_tokens(stored("a", "r"))));

    client.session().initialize().await.unwrap();
    assert_eq!(client.open_route(Route::Admin("users".into())), GuardDecision::Wait);

    client.auth().refresh_profile().await.unwrap();
    assert_eq!(client.resolve_route(), GuardDecision::Admit);
}

#[tokio::test]
async fn test_registration_field_error() {
    let backend = MockBackend::start().await;
    backend
        .respond("POST", "/auth/register/", 400, json!({"email": ["This field is required."]}))
        .await;
    let (client, _storage) = backend.client();
    client.bootstrap().await;

    let failure = client.auth().register(&RegistrationData::default()).await.unwrap_err();
    assert_eq!(failure.message, "This field is required.");
    assert_eq!(failure.kind, ErrorKind::ValidationFailed);
    assert_eq!(client.session().status(), SessionStatus::Anonymous);
}

#[tokio::test]
async fn test_registration_signs_in() {
    let backend = MockBackend::start().await;
    backend
        .respond(
            "POST",
            "/auth/register/",
            201,
            auth_body(user_json(12, "newbie", Role::Student), "NA", "NR"),
        )
        .await;
    let (client, storage) = backend.client();
    client.bootstrap().await;

    let data = RegistrationData {
        username: "newbie".into(),
        email: "newbie@campus.edu".into(),
        password: "pw12345678".into(),
        password_confirm: "pw12345678".into(),
        ..Default::default()
    };
    let identity = assert_ok!(client.auth().register(&data).await);

    assert_eq!(identity.username, "newbie");
    assert_eq!(storage.contents(), stored("NA", "NR"));
}

#[tokio::test]
async fn test_logout_beats_inflight_profile_fetch() {
    let backend = MockBackend::start().await;
    backend
        .respond_delayed(
            "GET",
            "/auth/profile/",
            200,
            user_json(1, "alice", Role::Student),
            Duration::from_millis(200),
        )
        .await;
    let (client, storage) = backend.client_with(Arc::new(MemoryTokenStore::with_tokens(stored(ACCESS, REFRESH))));
    client.session().initialize().await.unwrap();

    let fetch = {
        let client = client.clone();
        tokio::spawn(async move { client.auth().refresh_profile().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    client.auth().logout().await;

    let failure = fetch.await.unwrap().unwrap_err();
    assert_eq!(failure.kind, ErrorKind::Stale);
    assert_signed_out!(client, storage);
}

#[tokio::test]
async fn test_logout_beats_inflight_login() {
    let backend = MockBackend::start().await;
    backend
        .respond_delayed("POST", "/auth/login/", 200, alice_auth_body(), Duration::from_millis(200))
        .await;
    let (client, storage) = backend.client();
    client.bootstrap().await;

    let login = {
        let client = client.clone();
        tokio::spawn(async move { client.auth().login(&alice_credentials()).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    client.auth().logout().await;

    let failure = login.await.unwrap().unwrap_err();
    assert_eq!(failure.kind, ErrorKind::Stale);
    assert_signed_out!(client, storage);
}
