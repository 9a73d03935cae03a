//! Entity to model mappers
//!
//! Conversions between domain entities (grievance-core) and database models.
//! - `TryFrom<Model> for Entity`: Convert database rows to domain objects;
//!   enum-like text columns are parsed and rejected if unknown
//! - `*Row` structs: Prepare entity data for database operations

mod grievance;
mod ward;

pub use grievance::GrievanceRow;
