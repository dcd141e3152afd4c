//! Test suite for Campus Connect
//!
//! This module organizes all tests

pub mod common;
pub mod integration;
pub mod property;
