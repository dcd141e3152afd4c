//! Shared Module
//!
//! Types that describe the campus backend contract: the wire shapes the
//! REST API sends and accepts, the error taxonomy derived from its
//! responses, and the client configuration.
//!
//! # Overview
//!
//! Nothing in here performs I/O against the backend. The `app` module
//! builds the session lifecycle and HTTP plumbing on top of these types.

/// Application configuration
pub mod config;

/// Error taxonomy and backend message extraction
pub mod error;

/// Authenticated identity, roles and auth payloads
pub mod identity;

/// Campus resources (events, exams, results, study materials)
pub mod resources;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::{ApiError, ErrorKind};
pub use identity::{AuthResponse, Credentials, Identity, ProfileUpdate, RegistrationData, Role, TokenPair};
pub use resources::{
    ContactMessage, ContactMeta, ContactReceipt, DashboardStats, Event, EventDraft, Exam, ExamDraft, ExamResult, ListQuery,
    MaterialDraft, MaterialFile, MaterialType, Page, Resource, ResultDraft, StudyMaterial, UserSummary,
};
