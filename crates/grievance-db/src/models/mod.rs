//! Database models - SQLx-compatible structs for PostgreSQL tables

mod grievance;
mod ward;

pub use grievance::{GrievanceModel, GrievanceStatsModel, StatusUpdateModel};
pub use ward::WardModel;
