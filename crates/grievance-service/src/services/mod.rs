//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod context;
pub mod error;
pub mod grievance;
pub mod health;
pub mod ward;

#[cfg(test)]
mod tests;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use grievance::GrievanceService;
pub use health::HealthService;
pub use ward::WardService;
