//! Rebuild lifecycle state from a grievance's history

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::entities::{Grievance, GrievanceStatus, StatusUpdate};

/// Lifecycle fields derived from history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayedState {
    pub status: GrievanceStatus,
    pub resolution_remarks: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl ReplayedState {
    /// Whether the stored grievance agrees with its history
    pub fn matches(&self, grievance: &Grievance) -> bool {
        self.status == grievance.status
            && self.resolution_remarks == grievance.resolution_remarks
            && self.resolved_at == grievance.resolved_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("history is empty")]
    Empty,

    #[error("history does not start with a creation entry")]
    MissingCreation,

    #[error("entry {index} starts from {found:?} but the previous entry ended at {expected}")]
    Discontinuous {
        index: usize,
        expected: GrievanceStatus,
        found: Option<GrievanceStatus>,
    },
}

/// Fold history left to right
pub fn replay(history: &[StatusUpdate]) -> Result<ReplayedState, ReplayError> {
    let (first, rest) = history.split_first().ok_or(ReplayError::Empty)?;
    if !first.is_creation() || first.new_status != GrievanceStatus::Open {
        return Err(ReplayError::MissingCreation);
    }

    let initial = ReplayedState {
        status: GrievanceStatus::Open,
        resolution_remarks: None,
        resolved_at: None,
    };

    rest.iter()
        .enumerate()
        .try_fold(initial, |mut state, (offset, entry)| {
            if entry.old_status != Some(state.status) {
                return Err(ReplayError::Discontinuous {
                    index: offset + 1,
                    expected: state.status,
                    found: entry.old_status,
                });
            }
            if entry.new_status == GrievanceStatus::Resolved {
                if state.status != GrievanceStatus::Resolved {
                    state.resolution_remarks.clone_from(&entry.remarks);
                    state.resolved_at = Some(entry.created_at);
                }
            } else {
                state.resolved_at = None;
            }
            state.status = entry.new_status;
            Ok(state)
        })
}
