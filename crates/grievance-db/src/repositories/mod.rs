//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in grievance-core.

mod error;
mod grievance;
mod ward;

pub use grievance::PgGrievanceRepository;
pub use ward::PgWardRepository;
