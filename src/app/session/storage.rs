//! Durable token storage
//!
//! The session keeps exactly two values across restarts: the access and the
//! refresh token, under the fixed keys [`ACCESS_TOKEN_KEY`] and
//! [`REFRESH_TOKEN_KEY`]. Nothing else is persisted.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;

use crate::shared::TokenPair;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Tokens as read back from durable storage; either may be missing
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StoredTokens {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

impl StoredTokens {
    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }
}

impl From<&TokenPair> for StoredTokens {
    fn from(tokens: &TokenPair) -> Self {
        Self {
            access: Some(tokens.access.clone()),
            refresh: Some(tokens.refresh.clone()),
        }
    }
}

impl fmt::Debug for StoredTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredTokens")
            .field("access", &self.access.as_ref().map(|_| "<redacted>"))
            .field("refresh", &self.refresh.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Token storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Token database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Token storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Key/value persistence for the two session tokens.
///
/// Every call completes its write before returning.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<StoredTokens, StorageError>;

    /// Persist both tokens, replacing any previous values
    async fn save(&self, tokens: &TokenPair) -> Result<(), StorageError>;

    /// Remove both tokens
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Process-local token store, used for ephemeral sessions and tests
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<StoredTokens>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with tokens already "on disk", as after a previous run
    pub fn with_tokens(tokens: StoredTokens) -> Self {
        Self {
            tokens: Mutex::new(tokens),
        }
    }

    /// Current contents, for inspection
    pub fn contents(&self) -> StoredTokens {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<StoredTokens, StorageError> {
        Ok(self.contents())
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        *self.tokens.lock().unwrap_or_else(PoisonError::into_inner) = StoredTokens::from(tokens);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.tokens.lock().unwrap_or_else(PoisonError::into_inner) = StoredTokens::default();
        Ok(())
    }
}
