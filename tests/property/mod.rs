//! Property-based tests

pub mod session_proptest;
