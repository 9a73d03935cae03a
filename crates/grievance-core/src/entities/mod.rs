//! Domain entities - core business objects

mod grievance;
mod status_update;
mod ward;

pub use grievance::{Grievance, GrievanceCategory, GrievanceStatus, Location, Priority};
pub use status_update::StatusUpdate;
pub use ward::Ward;
