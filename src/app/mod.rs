//! Campus client application module
//!
//! The session lifecycle and everything that talks to the backend, plus the
//! egui desktop shell built on top of them.
//!
//! # Architecture
//!
//! - **`session`** - Session store and the durable token trait
//! - **`local_db`** - SQLite token store
//! - **`config`** - Client configuration wrapper
//! - **`api`** - Authenticated HTTP client with the global 401 rule
//! - **`auth`** - Login, registration, logout and profile operations
//! - **`routes`** - Views, access policies and the route guard
//! - **`campus_api`** - Events, exams, results, materials and dashboard calls
//! - **`context`** - `CampusClient`, the injectable bundle of all of the above
//! - **`state`** / **`views`** / **`theme`** - The eframe desktop shell
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use campus_connect::app::{CampusClient, Config};
//! use campus_connect::shared::Credentials;
//!
//! let client = CampusClient::open(Config::load()?).await?;
//! client.bootstrap().await;
//! client.auth().login(&Credentials::new("alice", "secret")).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod campus_api;
pub mod config;
pub mod context;
pub mod local_db;
pub mod routes;
pub mod session;
pub mod state;
pub mod theme;
pub mod views;

// Re-export commonly used types
pub use api::ApiClient;
pub use auth::{AuthController, AuthFailure};
pub use campus_api::CampusApi;
pub use config::Config;
pub use context::{CampusClient, ClientError};
pub use local_db::SqliteTokenStore;
pub use routes::{guard, navigation_items, AccessPolicy, GuardDecision, NavItem, Navigator, Route};
pub use session::{Commit, Epoch, MemoryTokenStore, Session, SessionStatus, SessionStore, StoredTokens, TokenStore};
pub use state::AppState;
