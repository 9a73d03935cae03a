//! Pure lifecycle operations: opening a grievance and applying a status
//! change. Neither touches storage; callers persist the returned records.

use chrono::{DateTime, Utc};

use super::policy::{LifecyclePolicy, SameStatusPolicy};
use super::validation::{normalize_remarks, validate_draft, GrievanceDraft};
use crate::entities::{Grievance, GrievanceStatus, StatusUpdate};
use crate::error::{DomainError, Violations};
use crate::value_objects::{Actor, Snowflake};

pub const REMARKS_REQUIRED: &str = "remarks required on status change";
pub const NO_CHANGE_REQUESTED: &str = "no change requested";

/// Id and clock reading for a new history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStamp {
    pub id: Snowflake,
    pub at: DateTime<Utc>,
}

impl EntryStamp {
    pub fn new(id: Snowflake, at: DateTime<Utc>) -> Self {
        Self { id, at }
    }
}

/// A grievance together with the history entry that produced its state
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub grievance: Grievance,
    pub entry: StatusUpdate,
}

/// Build a new `open` grievance and its `null -> open` entry
pub fn open_grievance(
    actor: &Actor,
    draft: &GrievanceDraft,
    grievance_id: Snowflake,
    stamp: EntryStamp,
) -> Result<Transition, DomainError> {
    if !actor.is_citizen() {
        return Err(DomainError::Forbidden(
            "only citizens may file grievances".to_string(),
        ));
    }

    let mut violations = Violations::new();
    if actor.ward_id.is_none() {
        violations.push("ward_id", "citizen has no ward assigned");
    }
    let valid = match validate_draft(draft) {
        Ok(valid) => Some(valid),
        Err(draft_violations) => {
            violations.extend(draft_violations);
            None
        }
    };

    let (Some(ward_id), Some(valid)) = (actor.ward_id, valid) else {
        return Err(DomainError::Validation(violations));
    };

    let grievance = Grievance {
        id: grievance_id,
        title: valid.title,
        description: valid.description,
        category: valid.category,
        status: GrievanceStatus::Open,
        photo_url: valid.photo_url,
        location: valid.location,
        ward_id,
        created_by: actor.id.clone(),
        assigned_to: None,
        resolution_remarks: None,
        priority: None,
        version: 1,
        created_at: stamp.at,
        updated_at: stamp.at,
        resolved_at: None,
    };
    let entry = StatusUpdate::creation(stamp.id, grievance_id, actor.id.clone(), stamp.at);

    Ok(Transition { grievance, entry })
}

impl LifecyclePolicy {
    /// Apply a requested status change to `current`
    ///
    /// `requested_status` is the raw status name so that an unknown status
    /// and over-long remarks are reported together. The entry timestamp is
    /// clamped to `current.updated_at` so history never runs backwards.
    pub fn apply(
        &self,
        current: &Grievance,
        actor: &Actor,
        requested_status: &str,
        remarks: Option<&str>,
        stamp: EntryStamp,
    ) -> Result<Transition, DomainError> {
        if !actor.is_ward_representative() {
            return Err(DomainError::Forbidden(
                "only ward representatives may update status".to_string(),
            ));
        }
        if actor.ward_id != Some(current.ward_id) {
            return Err(DomainError::GrievanceNotFound(current.id));
        }

        let mut violations = Violations::new();
        let new_status = GrievanceStatus::parse(requested_status.trim());
        if new_status.is_none() {
            violations.push(
                "status",
                format!("unknown status '{}'", requested_status.trim()),
            );
        }
        let remarks = normalize_remarks(&mut violations, remarks);
        let Some(new_status) = new_status else {
            return Err(DomainError::Validation(violations));
        };

        let old_status = current.status;
        if new_status == old_status {
            if remarks.is_none() || self.same_status == SameStatusPolicy::Reject {
                violations.push("status", NO_CHANGE_REQUESTED);
            }
        } else {
            if remarks.is_none() {
                violations.push("remarks", REMARKS_REQUIRED);
            }
            if !self.transitions.allows(old_status, new_status) {
                violations.push(
                    "status",
                    format!("transition from {old_status} to {new_status} is not allowed"),
                );
            }
        }
        if !violations.is_empty() {
            return Err(DomainError::Validation(violations));
        }

        let at = stamp.at.max(current.updated_at);
        let mut grievance = current.clone();
        grievance.status = new_status;
        if grievance.assigned_to.is_none() {
            grievance.assigned_to = Some(actor.id.clone());
        }
        if new_status == GrievanceStatus::Resolved {
            if old_status != GrievanceStatus::Resolved {
                grievance.resolution_remarks.clone_from(&remarks);
                grievance.resolved_at = Some(at);
            }
        } else {
            grievance.resolved_at = None;
        }
        grievance.updated_at = at;
        grievance.version += 1;

        let entry = StatusUpdate {
            id: stamp.id,
            grievance_id: current.id,
            old_status: Some(old_status),
            new_status,
            remarks,
            updated_by: actor.id.clone(),
            created_at: at,
        };

        Ok(Transition { grievance, entry })
    }
}
