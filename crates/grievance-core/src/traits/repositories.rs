//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Implementations must keep a grievance and
//! its history consistent: every write that touches one touches the other
//! in the same atomic unit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Grievance, StatusUpdate, Ward};
use crate::error::DomainError;
use crate::lifecycle::Transition;
use crate::query::{GrievanceFilter, GrievanceScope, GrievanceStats, Page, PageRequest};
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Grievance Repository
// ============================================================================

#[async_trait]
pub trait GrievanceRepository: Send + Sync {
    /// Insert a new grievance together with its creation entry
    async fn create(&self, created: &Transition) -> RepoResult<()>;

    /// Find grievance by ID, regardless of scope
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Grievance>>;

    /// Filtered, sorted page within a scope; `total` ignores paging
    async fn list(
        &self,
        scope: &GrievanceScope,
        filter: &GrievanceFilter,
        page: PageRequest,
    ) -> RepoResult<Page<Grievance>>;

    /// History ordered by `created_at`, then `id`
    async fn history(&self, grievance_id: Snowflake) -> RepoResult<Vec<StatusUpdate>>;

    /// Persist a status transition if the stored version still equals
    /// `expected_version`; otherwise `DomainError::Conflict` and nothing
    /// is written
    async fn apply_transition(&self, transition: &Transition, expected_version: i64)
        -> RepoResult<()>;

    /// Persist non-status fields (priority) under the same version check
    async fn save(&self, grievance: &Grievance, expected_version: i64) -> RepoResult<()>;

    /// Aggregate statistics within a scope
    async fn stats(&self, scope: &GrievanceScope, now: DateTime<Utc>) -> RepoResult<GrievanceStats>;

    /// Cheap connectivity check for readiness probes
    async fn ping(&self) -> RepoResult<()>;
}

// ============================================================================
// Ward Repository
// ============================================================================

#[async_trait]
pub trait WardRepository: Send + Sync {
    /// All wards ordered by id
    async fn list(&self) -> RepoResult<Vec<Ward>>;

    /// Find ward by ID
    async fn find_by_id(&self, id: i32) -> RepoResult<Option<Ward>>;
}
