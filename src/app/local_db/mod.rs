//! # Local Token Database
//!
//! SQLite-backed durable storage for the session tokens. The database holds a
//! single key/value table; the access and refresh tokens live under the fixed
//! keys from [`crate::app::session::storage`].
//!
//! ## Durability
//!
//! The connection runs in WAL mode with `synchronous=FULL`, and every write
//! commits in its own transaction before the call returns. A pool of one
//! connection keeps writes strictly ordered.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), campus_connect::app::session::StorageError> {
//! use campus_connect::app::local_db::SqliteTokenStore;
//!
//! let store = SqliteTokenStore::open("/tmp/campus/session.db").await?;
//! # Ok(())
//! # }
//! ```

pub mod schema;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};

use crate::app::session::storage::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::app::session::{StorageError, StoredTokens, TokenStore};
use crate::shared::TokenPair;

/// Durable token store on a local SQLite file
#[derive(Debug, Clone)]
pub struct SqliteTokenStore {
    pool: SqlitePool,
    path: Option<PathBuf>,
}

impl SqliteTokenStore {
    /// Open or create the token database at `path`, creating parent directories
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self {
            pool,
            path: Some(path.to_path_buf()),
        };
        store.init_schema().await?;

        tracing::debug!(path = %path.display(), "Opened token database");
        Ok(store)
    }

    /// Private in-memory database; contents vanish with the store
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options: SqliteConnectOptions = "sqlite::memory:".parse()?;

        // The database lives only as long as its single connection
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool, path: None };
        store.init_schema().await?;
        Ok(store)
    }

    /// File backing this store, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn init_schema(&self) -> Result<(), StorageError> {
        sqlx::query(schema::CREATE_MIGRATIONS_TABLE)
            .execute(&self.pool)
            .await?;

        let (current_version,): (i32,) =
            sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
                .fetch_one(&self.pool)
                .await?;

        for version in schema::pending_migrations(current_version) {
            self.apply_migration(version).await?;
        }

        Ok(())
    }

    async fn apply_migration(&self, version: i32) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;

        if version == 1 {
            sqlx::query(schema::CREATE_SESSION_TOKENS_TABLE)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?, ?)")
            .bind(version)
            .bind(chrono::Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(version, "Applied token database migration");
        Ok(())
    }
}

#[async_trait]
impl TokenStore for SqliteTokenStore {
    async fn load(&self) -> Result<StoredTokens, StorageError> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM session_tokens")
            .fetch_all(&self.pool)
            .await?;

        let mut tokens = StoredTokens::default();
        for (key, value) in rows {
            match key.as_str() {
                ACCESS_TOKEN_KEY => tokens.access = Some(value),
                REFRESH_TOKEN_KEY => tokens.refresh = Some(value),
                other => tracing::debug!(key = other, "Ignoring unknown token key"),
            }
        }
        Ok(tokens)
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        for (key, value) in [(ACCESS_TOKEN_KEY, &tokens.access), (REFRESH_TOKEN_KEY, &tokens.refresh)] {
            sqlx::query(
                "INSERT INTO session_tokens (key, value, updated_at) VALUES (?, ?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            )
            .bind(key)
            .bind(value)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM session_tokens WHERE key IN (?, ?)")
            .bind(ACCESS_TOKEN_KEY)
            .bind(REFRESH_TOKEN_KEY)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
