//! Durable tokens across client restarts

use campus_connect::app::session::TokenStore;
use campus_connect::app::{CampusClient, Config, SessionStatus, SqliteTokenStore};
use campus_connect::shared::{AppConfig, Role};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use crate::assert_ok;
use crate::common::*;

fn config(backend: &MockBackend, dir: &TempDir) -> Config {
    Config::with_builder(
        AppConfig::builder()
            .api_base_url(format!("{}/api", backend.server.uri()))
            .data_dir(dir.path()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_session_survives_restart() {
    let backend = MockBackend::start().await;
    backend.respond("POST", "/auth/login/", 200, alice_auth_body()).await;
    backend
        .respond_for_token("GET", "/auth/profile/", ACCESS, 200, user_json(1, "alice", Role::Student))
        .await;
    let dir = TempDir::new().unwrap();

    {
        let client = assert_ok!(CampusClient::open(config(&backend, &dir)).await);
        assert_eq!(client.bootstrap().await, SessionStatus::Anonymous);
        assert_ok!(client.auth().login(&alice_credentials()).await);
    }

    let restarted = assert_ok!(CampusClient::open(config(&backend, &dir)).await);
    assert_eq!(restarted.bootstrap().await, SessionStatus::Authenticated);
    assert_eq!(restarted.session().access_token().as_deref(), Some(ACCESS));
}

#[tokio::test]
async fn test_logout_empties_database() {
    let backend = MockBackend::start().await;
    backend.respond("POST", "/auth/login/", 200, alice_auth_body()).await;
    let dir = TempDir::new().unwrap();

    let client = assert_ok!(CampusClient::open(config(&backend, &dir)).await);
    client.bootstrap().await;
    assert_ok!(client.auth().login(&alice_credentials()).await);
    client.auth().logout().await;

    let store = assert_ok!(SqliteTokenStore::open(dir.path().join("session.db")).await);
    assert!(store.load().await.unwrap().is_empty());
}
