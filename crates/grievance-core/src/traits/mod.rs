//! Ports implemented by the infrastructure layer

mod repositories;

pub use repositories::{GrievanceRepository, RepoResult, WardRepository};
