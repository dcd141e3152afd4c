//! Auth Controller
//!
//! The only component that moves the session between anonymous and
//! authenticated through backend calls. Operations never panic and never
//! hand raw transport errors to page code: every failure comes back as an
//! [`AuthFailure`] with a message ready for display.
//!
//! Results are committed against the session epoch captured before the
//! request was sent, so a logout that happens while a call is in flight
//! stays final.

use std::sync::Arc;

use thiserror::Error;

use crate::app::api::ApiClient;
use crate::app::session::{Commit, Epoch, SessionStore, StorageError};
use crate::shared::error::first_field_error;
use crate::shared::{ApiError, AuthResponse, Credentials, ErrorKind, Identity, ProfileUpdate, RegistrationData};

pub const LOGIN_PATH: &str = "/auth/login/";
pub const REGISTER_PATH: &str = "/auth/register/";
pub const PROFILE_PATH: &str = "/auth/profile/";
pub const PROFILE_UPDATE_PATH: &str = "/auth/profile/update/";

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";
const PROFILE_UPDATE_FAILED: &str = "Profile update failed";
const SESSION_CHANGED: &str = "Session changed, please try again";
const STORAGE_FAILED: &str = "Could not save your session. Please try again.";
const NOT_SIGNED_IN: &str = "Not signed in";

/// Failed auth operation, ready to show to the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl AuthFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Result discarded because the session changed while the request was in flight
    pub fn stale() -> Self {
        Self::new(ErrorKind::Stale, SESSION_CHANGED)
    }

    fn storage(err: StorageError) -> Self {
        tracing::error!("Failed to persist session tokens: {}", err);
        Self::new(ErrorKind::Storage, STORAGE_FAILED)
    }

    fn from_api(err: &ApiError, message: Option<String>, fallback: &str) -> Self {
        Self::new(err.kind(), message.unwrap_or_else(|| fallback.to_string()))
    }
}

/// Login, registration, logout and profile operations
#[derive(Debug, Clone)]
pub struct AuthController {
    api: ApiClient,
}

impl AuthController {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.api.session()
    }

    /// Sign in and store the issued tokens
    pub async fn login(&self, credentials: &Credentials) -> Result<Identity, AuthFailure> {
        let epoch = self.session().epoch();
        tracing::info!(user = %credentials.username, "Logging in");

        let response: AuthResponse = self
            .api
            .post_json(LOGIN_PATH, credentials)
            .await
            .map_err(|err| AuthFailure::from_api(&err, err.backend_message(), LOGIN_FAILED))?;

        self.establish(epoch, response).await
    }

    /// Create an account and sign in as it
    pub async fn register(&self, data: &RegistrationData) -> Result<Identity, AuthFailure> {
        let epoch = self.session().epoch();
        tracing::info!(user = %data.username, role = %data.role, "Registering");

        let response: AuthResponse = self
            .api
            .post_json(REGISTER_PATH, data)
            .await
            .map_err(|err| {
                let message = err.body().and_then(first_field_error);
                AuthFailure::from_api(&err, message, REGISTRATION_FAILED)
            })?;

        self.establish(epoch, response).await
    }

    /// Forget the session locally. The backend is not contacted.
    pub async fn logout(&self) {
        tracing::info!("Logging out");
        self.session().clear().await;
    }

    /// Verify the held access token by fetching the profile.
    ///
    /// On success the session becomes authenticated with the returned
    /// identity; on any failure the session is cleared.
    pub async fn refresh_profile(&self) -> Result<Identity, AuthFailure> {
        let (token, epoch) = self.session().bearer();
        if token.is_none() {
            return Err(AuthFailure::new(ErrorKind::Unauthorized, NOT_SIGNED_IN));
        }

        match self.api.get_json::<Identity>(PROFILE_PATH).await {
            Ok(identity) => match self.session().promote_if(epoch, identity.clone()).await {
                Commit::Applied => Ok(identity),
                Commit::Stale => Err(AuthFailure::stale()),
            },
            Err(err) => {
                tracing::warn!("Profile check failed: {}", err);
                // A 401 was already handled by the client; this covers everything else
                self.session().clear_if(epoch).await;
                Err(AuthFailure::new(err.kind(), err.user_message()))
            }
        }
    }

    /// Apply a partial profile update. The identity is left as is on failure.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Identity, AuthFailure> {
        let epoch = self.session().epoch();

        let identity: Identity = self
            .api
            .put_json(PROFILE_UPDATE_PATH, update)
            .await
            .map_err(|err| AuthFailure::from_api(&err, err.backend_message(), PROFILE_UPDATE_FAILED))?;

        match self.session().update_identity_if(epoch, identity.clone()).await {
            Commit::Applied => Ok(identity),
            Commit::Stale => Err(AuthFailure::stale()),
        }
    }

    async fn establish(&self, epoch: Epoch, response: AuthResponse) -> Result<Identity, AuthFailure> {
        let AuthResponse { user, tokens } = response;
        match self.session().set_authenticated_if(epoch, user.clone(), tokens).await {
            Ok(Commit::Applied) => Ok(user),
            Ok(Commit::Stale) => Err(AuthFailure::stale()),
            Err(err) => Err(AuthFailure::storage(err)),
        }
    }
}
