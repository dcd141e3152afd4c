//! Session Store
//!
//! Single source of truth for authentication state. Consumers read cheap
//! snapshots; only the mutators below change state, and each one replaces
//! the session wholesale.
//!
//! # Epochs
//!
//! The store carries an epoch that moves every time the token set changes
//! (`set_authenticated`, `clear`). Requests capture it before dispatch and
//! commit their outcome with the `*_if` mutators, which refuse to apply a
//! result produced under an older session. A logout therefore cannot be
//! undone by a profile fetch that was already in flight, and a 401 for a
//! previous session cannot clear the current one.
//!
//! # Ordering
//!
//! Mutations are serialized by an async lock. Durable storage is written
//! before the in-memory session is replaced, so a crash in between leaves at
//! worst a stale durable token with no in-memory session.

pub mod storage;

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::{watch, Mutex};

use crate::shared::{Identity, TokenPair};

pub use storage::{MemoryTokenStore, StorageError, StoredTokens, TokenStore};

/// Authentication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// Durable token found (or not yet looked for); identity unverified
    Loading,
    Authenticated,
    Anonymous,
}

/// Session generation; see the module docs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

impl Epoch {
    fn next(self) -> Self {
        Epoch(self.0 + 1)
    }
}

/// Outcome of an epoch-guarded mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied,
    /// The session changed since the epoch was captured; nothing was written
    Stale,
}

/// Immutable view of the session.
///
/// Constructed only through the three state constructors, so `identity` is
/// present exactly when the status is `Authenticated`, and an access token
/// is always present when authenticated.
#[derive(Clone, PartialEq)]
pub struct Session {
    access_token: Option<String>,
    refresh_token: Option<String>,
    identity: Option<Identity>,
    status: SessionStatus,
}

impl Session {
    /// Session before `initialize()` has run
    fn pending() -> Self {
        Self {
            access_token: None,
            refresh_token: None,
            identity: None,
            status: SessionStatus::Loading,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            access_token: None,
            refresh_token: None,
            identity: None,
            status: SessionStatus::Anonymous,
        }
    }

    fn unverified(access: String, refresh: Option<String>) -> Self {
        Self {
            access_token: Some(access),
            refresh_token: refresh,
            identity: None,
            status: SessionStatus::Loading,
        }
    }

    pub fn authenticated(identity: Identity, tokens: TokenPair) -> Self {
        Self::verified(identity, tokens.access, Some(tokens.refresh))
    }

    /// Authenticated with whatever refresh token was stored, possibly none
    fn verified(identity: Identity, access: String, refresh: Option<String>) -> Self {
        Self {
            access_token: Some(access),
            refresh_token: refresh,
            identity: Some(identity),
            status: SessionStatus::Authenticated,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Stored but never used to renew the access token; expiry is handled by the 401 path
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::pending()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status)
            .field("identity", &self.identity.as_ref().map(|i| &i.username))
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

struct State {
    session: Session,
    epoch: Epoch,
}

/// Process-wide session service. Create one per process and share it via `Arc`.
pub struct SessionStore {
    storage: Arc<dyn TokenStore>,
    state: RwLock<State>,
    mutation: Mutex<()>,
    status_tx: watch::Sender<SessionStatus>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn TokenStore>) -> Self {
        let (status_tx, _) = watch::channel(SessionStatus::Loading);
        Self {
            storage,
            state: RwLock::new(State {
                session: Session::pending(),
                epoch: Epoch(0),
            }),
            mutation: Mutex::new(()),
            status_tx,
        }
    }

    pub fn snapshot(&self) -> Session {
        self.read(|state| state.session.clone())
    }

    pub fn status(&self) -> SessionStatus {
        self.read(|state| state.session.status)
    }

    pub fn identity(&self) -> Option<Identity> {
        self.read(|state| state.session.identity.clone())
    }

    /// Read fresh on every call; never cache the result across requests
    pub fn access_token(&self) -> Option<String> {
        self.read(|state| state.session.access_token.clone())
    }

    pub fn epoch(&self) -> Epoch {
        self.read(|state| state.epoch)
    }

    /// Access token and epoch read together, for request dispatch
    pub fn bearer(&self) -> (Option<String>, Epoch) {
        self.read(|state| (state.session.access_token.clone(), state.epoch))
    }

    /// Receiver notified on every status change
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status_tx.subscribe()
    }

    /// Load durable tokens at startup.
    ///
    /// With an access token the session becomes `Loading` until the profile
    /// fetch settles it; without one it becomes `Anonymous`. A storage read
    /// failure is treated as "no token".
    pub async fn initialize(&self) -> Result<SessionStatus, StorageError> {
        let _guard = self.mutation.lock().await;

        let loaded = self.storage.load().await;
        let session = match &loaded {
            Ok(StoredTokens {
                access: Some(access),
                refresh,
            }) => Session::unverified(access.clone(), refresh.clone()),
            Ok(_) => Session::anonymous(),
            Err(err) => {
                tracing::error!("Failed to read stored tokens: {}", err);
                Session::anonymous()
            }
        };

        let status = session.status;
        self.write(|state| state.session = session);
        self.publish(status);
        tracing::info!(?status, "Session initialized");

        loaded.map(|_| status)
    }

    /// Store identity and tokens, persisting both tokens first
    pub async fn set_authenticated(
        &self,
        identity: Identity,
        tokens: TokenPair,
    ) -> Result<Epoch, StorageError> {
        let _guard = self.mutation.lock().await;
        self.apply_authenticated(identity, tokens).await
    }

    /// `set_authenticated`, only if the session is still at `expected`
    pub async fn set_authenticated_if(
        &self,
        expected: Epoch,
        identity: Identity,
        tokens: TokenPair,
    ) -> Result<Commit, StorageError> {
        let _guard = self.mutation.lock().await;
        if self.epoch() != expected {
            tracing::warn!(user = %identity.username, "Discarding sign-in for a superseded session");
            return Ok(Commit::Stale);
        }
        self.apply_authenticated(identity, tokens).await?;
        Ok(Commit::Applied)
    }

    async fn apply_authenticated(
        &self,
        identity: Identity,
        tokens: TokenPair,
    ) -> Result<Epoch, StorageError> {
        self.storage.save(&tokens).await?;

        let user = identity.username.clone();
        let role = identity.role;
        let epoch = self.write(|state| {
            state.epoch = state.epoch.next();
            state.session = Session::authenticated(identity, tokens);
            state.epoch
        });
        self.publish(SessionStatus::Authenticated);
        tracing::info!(%user, %role, "Session authenticated");

        Ok(epoch)
    }

    /// Promote an unverified session to authenticated with a fetched identity.
    ///
    /// Tokens are untouched. Stale if the epoch moved or no access token is held.
    pub async fn promote_if(&self, expected: Epoch, identity: Identity) -> Commit {
        let _guard = self.mutation.lock().await;
        let user = identity.username.clone();
        let applied = self.write(|state| {
            if state.epoch != expected {
                return false;
            }
            let Some(access) = state.session.access_token.take() else {
                return false;
            };
            let refresh = state.session.refresh_token.take();
            state.session = Session::verified(identity, access, refresh);
            true
        });

        if applied {
            self.publish(SessionStatus::Authenticated);
            tracing::info!(%user, "Session verified");
            Commit::Applied
        } else {
            tracing::warn!(%user, "Discarding profile for a superseded session");
            Commit::Stale
        }
    }

    /// Replace the identity of an authenticated session; tokens are untouched
    pub async fn update_identity(&self, identity: Identity) -> Commit {
        let expected = self.epoch();
        self.update_identity_if(expected, identity).await
    }

    /// `update_identity`, only if the session is still at `expected`
    pub async fn update_identity_if(&self, expected: Epoch, identity: Identity) -> Commit {
        let _guard = self.mutation.lock().await;
        let user = identity.username.clone();
        let applied = self.write(|state| {
            if state.epoch != expected || state.session.status != SessionStatus::Authenticated {
                return false;
            }
            state.session.identity = Some(identity);
            true
        });

        if applied {
            tracing::info!(%user, "Identity updated");
            Commit::Applied
        } else {
            tracing::warn!(%user, "Discarding identity update for a superseded session");
            Commit::Stale
        }
    }

    /// Drop identity and tokens from memory and durable storage.
    ///
    /// Always succeeds in memory; a storage failure is logged.
    pub async fn clear(&self) {
        let _guard = self.mutation.lock().await;
        self.apply_clear().await;
    }

    /// `clear`, only if the session is still at `expected`. Returns whether it cleared.
    pub async fn clear_if(&self, expected: Epoch) -> bool {
        let _guard = self.mutation.lock().await;
        if self.epoch() != expected {
            return false;
        }
        self.apply_clear().await;
        true
    }

    async fn apply_clear(&self) {
        if let Err(err) = self.storage.clear().await {
            tracing::error!("Failed to remove stored tokens: {}", err);
        }

        self.write(|state| {
            state.epoch = state.epoch.next();
            state.session = Session::anonymous();
        });
        self.publish(SessionStatus::Anonymous);
        tracing::info!("Session cleared");
    }

    fn publish(&self, status: SessionStatus) {
        self.status_tx.send_if_modified(|current| {
            if *current == status {
                return false;
            }
            *current = status;
            true
        });
    }

    fn read<T>(&self, f: impl FnOnce(&State) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.snapshot())
            .field("epoch", &self.epoch())
            .finish_non_exhaustive()
    }
}
