//! Client context
//!
//! [`CampusClient`] owns one instance of every session-related service and
//! is passed to whatever needs them. It lives for the whole process.

use std::sync::Arc;

use thiserror::Error;

use crate::app::api::ApiClient;
use crate::app::auth::{AuthController, AuthFailure};
use crate::app::campus_api::CampusApi;
use crate::app::config::Config;
use crate::app::local_db::SqliteTokenStore;
use crate::app::routes::{GuardDecision, Navigator, Route};
use crate::app::session::{SessionStatus, SessionStore, StorageError, TokenStore};
use crate::shared::{ApiError, ConfigError};

/// Errors while assembling the client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("HTTP client error: {0}")]
    Http(#[from] ApiError),
}

/// Session, navigation and backend access for one process
#[derive(Debug, Clone)]
pub struct CampusClient {
    config: Config,
    session: Arc<SessionStore>,
    navigator: Navigator,
    api: ApiClient,
    auth: AuthController,
    campus: CampusApi,
}

impl CampusClient {
    /// Open the durable token database named by the config
    pub async fn open(config: Config) -> Result<Self, ClientError> {
        let storage = SqliteTokenStore::open(config.storage_path()).await?;
        Self::with_storage(config, Arc::new(storage))
    }

    pub fn with_storage(config: Config, storage: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let session = Arc::new(SessionStore::new(storage));
        let navigator = Navigator::default();
        let api = ApiClient::new(config.clone(), session.clone(), navigator.clone())?;

        Ok(Self {
            auth: AuthController::new(api.clone()),
            campus: CampusApi::new(api.clone()),
            config,
            session,
            navigator,
            api,
        })
    }

    /// Load durable tokens and, when one is found, verify it with the backend.
    ///
    /// Returns the settled status. No request is made without a token.
    pub async fn bootstrap(&self) -> SessionStatus {
        if let Err(err) = self.session.initialize().await {
            tracing::warn!("Starting without stored session: {}", err);
        }

        if self.session.status() == SessionStatus::Loading {
            match self.auth.refresh_profile().await {
                Ok(identity) => tracing::info!(user = %identity.username, "Restored session"),
                Err(AuthFailure { kind, message }) => {
                    tracing::info!(?kind, "Stored session rejected: {}", message)
                }
            }
        }

        self.session.status()
    }

    /// Guard decision for the current route, following any redirect
    pub fn resolve_route(&self) -> GuardDecision {
        self.navigator.resolve(&self.session.snapshot())
    }

    /// Navigate to `route` and run the guard on it
    pub fn open_route(&self, route: Route) -> GuardDecision {
        self.navigator.navigate(route);
        self.resolve_route()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn auth(&self) -> &AuthController {
        &self.auth
    }

    pub fn campus(&self) -> &CampusApi {
        &self.campus
    }
}
