//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, and path parsing.

mod auth;
mod path;
mod validated;

pub use auth::AuthActor;
pub use path::{ApiPath, GrievanceIdPath, WardIdPath};
pub use validated::{ValidatedJson, ValidatedQuery};
