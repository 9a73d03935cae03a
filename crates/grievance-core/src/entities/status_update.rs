//! Status update entity - one immutable entry in a grievance's audit trail

use chrono::{DateTime, Utc};

use super::grievance::GrievanceStatus;
use crate::value_objects::Snowflake;

/// Append-only history entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub id: Snowflake,
    pub grievance_id: Snowflake,
    /// `None` only for the creation entry
    pub old_status: Option<GrievanceStatus>,
    pub new_status: GrievanceStatus,
    pub remarks: Option<String>,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
}

impl StatusUpdate {
    /// The synthetic `null -> open` entry written alongside a new grievance
    pub fn creation(
        id: Snowflake,
        grievance_id: Snowflake,
        created_by: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            grievance_id,
            old_status: None,
            new_status: GrievanceStatus::Open,
            remarks: None,
            updated_by: created_by.into(),
            created_at,
        }
    }

    #[inline]
    pub fn is_creation(&self) -> bool {
        self.old_status.is_none()
    }

    /// True when the entry records a change of status rather than a
    /// remarks-only confirmation
    #[inline]
    pub fn changes_status(&self) -> bool {
        self.old_status != Some(self.new_status)
    }
}
