//! # grievance-core
//!
//! Domain layer containing entities, value objects, lifecycle rules, query
//! types, and repository traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod lifecycle;
pub mod query;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Grievance, GrievanceCategory, GrievanceStatus, Location, Priority, StatusUpdate, Ward};
pub use error::{DomainError, FieldViolation, Violations};
pub use lifecycle::{
    open_grievance, replay, EntryStamp, GrievanceDraft, LifecyclePolicy, ReplayError,
    ReplayedState, SameStatusPolicy, Transition, TransitionPolicy,
};
pub use query::{GrievanceFilter, GrievanceScope, GrievanceStats, Page, PageLimits, PageRequest, SortKey};
pub use traits::{GrievanceRepository, RepoResult, WardRepository};
pub use value_objects::{Actor, ActorRole, Snowflake, SnowflakeGenerator, SnowflakeParseError};
