//! Common test utilities and helpers
//!
//! - Mock backend built on wiremock
//! - Identity and response fixtures
//! - Custom assertion macros

pub mod assertions;
pub mod fixtures;
pub mod mock_backend;

// Re-export commonly used utilities
pub use fixtures::*;
pub use mock_backend::*;
