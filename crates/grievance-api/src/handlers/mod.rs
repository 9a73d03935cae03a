//! Route handlers
//!
//! All HTTP request handlers organized by resource.

pub mod grievances;
pub mod health;
pub mod wards;
