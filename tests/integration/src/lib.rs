//! Integration test utilities for the grievance service
//!
//! Helpers for running end-to-end tests against the REST API backed by the
//! in-memory store.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
