//! Domain error types

mod domain_error;
mod violations;

pub use domain_error::DomainError;
pub use violations::{FieldViolation, Violations};
