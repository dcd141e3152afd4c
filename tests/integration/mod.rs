//! Integration tests against a mocked campus backend

pub mod config_test;
pub mod persistence_test;
pub mod session_lifecycle_test;
pub mod unauthorized_test;
