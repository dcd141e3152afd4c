//! Campus Connect - Main Library
//!
//! Client for the Campus Connect backend: students, faculty and
//! administrators sign in and work with events, exams, results and study
//! materials over a REST API.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types, the error taxonomy and configuration
//!   - Identity, roles and auth payloads
//!   - Campus resources and paged lists
//!   - Backend message extraction
//!
//! - **`app`** - Session lifecycle and the desktop client
//!   - Session store with durable SQLite token storage
//!   - API client that attaches bearer tokens and reacts to 401
//!   - Auth controller, route guard and navigation
//!   - egui/eframe shell
//!
//! # Session lifecycle
//!
//! ```text
//!            initialize()
//!  Loading ───────────────► Anonymous ◄──────────────┐
//!     │ (stored token)         │ login / register    │ logout, 401,
//!     │ refresh_profile()      ▼                     │ failed profile check
//!     └──────────────────► Authenticated ────────────┘
//! ```
//!
//! Every change of the token set moves the session epoch. Results of
//! requests sent under an older epoch are discarded, so logout is final.
//!
//! # Error Handling
//!
//! - `shared::error::ApiError` for backend calls, classified by `ErrorKind`
//! - `app::AuthFailure` for auth operations, always carrying a display message
//! - `shared::ConfigError`, `app::session::StorageError` and `app::ClientError`
//!   for startup

/// Shared types and data structures
pub mod shared;

/// Session, API client, auth controller, route guard and desktop shell
pub mod app;
