//! Shared Error Types
//!
//! This module defines the error taxonomy for calls against the campus
//! backend, and the rules for turning a backend error body into a message a
//! person can read.
//!
//! # Error Categories
//!
//! - `Unauthorized` - HTTP 401; the API client clears the session before
//!   returning it
//! - `Validation` - any other 4xx (except 404), usually with field errors
//! - `NotFound` / `Server` - 404 and 5xx
//! - `Network` - the request never completed
//! - `Decode` - a 2xx body that did not match the expected shape
//!
//! # Usage
//!
//! ```rust
//! use campus_connect::shared::error::first_field_error;
//! use serde_json::json;
//!
//! let body = json!({"email": ["This field is required."]});
//! assert_eq!(first_field_error(&body).as_deref(), Some("This field is required."));
//! ```
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Coarse classification used by callers deciding how to surface a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    ValidationFailed,
    NetworkFailure,
    NotFound,
    ServerError,
    Decode,
    /// Durable token storage could not be written
    Storage,
    /// The session changed while the request was in flight
    Stale,
}

/// Errors returned by the API client
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 401. The session has already been cleared when this is returned.
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("session expired"))]
    Unauthorized { message: Option<String> },

    /// Any other 4xx except 404
    #[error("Request rejected ({status}): {message}")]
    Validation {
        status: StatusCode,
        message: String,
        body: Option<Value>,
    },

    /// HTTP 404
    #[error("Not found: {message}")]
    NotFound { message: String, body: Option<Value> },

    /// 5xx, or any non-success status outside the 4xx range
    #[error("Server error ({status}): {message}")]
    Server {
        status: StatusCode,
        message: String,
        body: Option<Value>,
    },

    /// The request could not complete (connection, TLS, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success body that did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Classify a non-success response.
    ///
    /// `body` is the parsed JSON body, or the raw text wrapped in
    /// `Value::String` when it was not JSON.
    pub fn from_status(status: StatusCode, body: Option<Value>) -> Self {
        let backend = body.as_ref().and_then(backend_message);

        if status == StatusCode::UNAUTHORIZED {
            return Self::Unauthorized { message: backend };
        }

        let fallback = || status.canonical_reason().unwrap_or("Request failed").to_string();

        if status == StatusCode::NOT_FOUND {
            return Self::NotFound {
                message: backend.unwrap_or_else(fallback),
                body,
            };
        }

        if status.is_client_error() {
            let message = body
                .as_ref()
                .and_then(first_field_error)
                .unwrap_or_else(fallback);
            return Self::Validation { status, message, body };
        }

        Self::Server {
            status,
            message: backend.unwrap_or_else(fallback),
            body,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Validation { .. } => ErrorKind::ValidationFailed,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Server { .. } => ErrorKind::ServerError,
            Self::Network(_) => ErrorKind::NetworkFailure,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    /// HTTP status of the failing response, if there was one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Validation { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Self::Network(err) => err.status(),
            Self::Decode(_) => None,
        }
    }

    /// Error body as sent by the backend (not kept for 401)
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Validation { body, .. } | Self::NotFound { body, .. } | Self::Server { body, .. } => {
                body.as_ref()
            }
            _ => None,
        }
    }

    /// Message from the backend's `message`/`detail` field, if any
    pub fn backend_message(&self) -> Option<String> {
        match self {
            Self::Unauthorized { message } => message.clone(),
            Self::Validation { body, .. } | Self::NotFound { body, .. } | Self::Server { body, .. } => {
                body.as_ref().and_then(backend_message)
            }
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    /// Text suitable for a notification
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { .. } => "Your session has expired. Please log in again.".to_string(),
            Self::Validation { message, .. }
            | Self::NotFound { message, .. }
            | Self::Server { message, .. } => message.clone(),
            Self::Network(_) => "Could not reach the server. Please try again.".to_string(),
            Self::Decode(_) => "Unexpected response from the server.".to_string(),
        }
    }
}

/// Message from a backend error body.
///
/// A plain string body is used verbatim; an object contributes its
/// `message` or `detail` string field.
pub fn backend_message(body: &Value) -> Option<String> {
    match body {
        Value::String(text) => non_empty(text),
        Value::Object(map) => ["message", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str).and_then(non_empty)),
        _ => None,
    }
}

/// Message from a field-error body.
///
/// Precedence: a plain string body verbatim, then the first value of the
/// first key (unwrapping one level of list nesting). Returns `None` when
/// neither yields a non-empty string.
pub fn first_field_error(body: &Value) -> Option<String> {
    match body {
        Value::String(text) => non_empty(text),
        Value::Object(map) => {
            let (_, first) = map.iter().next()?;
            let value = match first {
                Value::Array(items) => items.first()?,
                other => other,
            };
            value.as_str().and_then(non_empty)
        }
        _ => None,
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.trim().is_empty()).then(|| text.to_string())
}
