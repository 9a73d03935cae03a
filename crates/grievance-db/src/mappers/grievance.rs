//! Grievance and StatusUpdate entity <-> model mapper

use grievance_core::entities::{
    Grievance, GrievanceCategory, GrievanceStatus, Location, Priority, StatusUpdate,
};
use grievance_core::query::GrievanceStats;
use grievance_core::{DomainError, Snowflake};

use crate::models::{GrievanceModel, GrievanceStatsModel, StatusUpdateModel};

fn corrupt(column: &str, value: &str) -> DomainError {
    DomainError::DatabaseError(format!("unexpected {column} value '{value}'"))
}

fn parse_status(column: &str, value: &str) -> Result<GrievanceStatus, DomainError> {
    GrievanceStatus::parse(value).ok_or_else(|| corrupt(column, value))
}

/// Convert GrievanceModel to Grievance entity
impl TryFrom<GrievanceModel> for Grievance {
    type Error = DomainError;

    fn try_from(model: GrievanceModel) -> Result<Self, Self::Error> {
        let category = GrievanceCategory::parse(&model.category)
            .ok_or_else(|| corrupt("category", &model.category))?;
        let status = parse_status("status", &model.status)?;
        let priority = model
            .priority
            .as_deref()
            .map(|p| Priority::parse(p).ok_or_else(|| corrupt("priority", p)))
            .transpose()?;
        let location = match (model.latitude, model.longitude) {
            (Some(latitude), Some(longitude)) => Some(Location {
                latitude,
                longitude,
            }),
            _ => None,
        };

        Ok(Grievance {
            id: Snowflake::new(model.id),
            title: model.title,
            description: model.description,
            category,
            status,
            photo_url: model.photo_url,
            location,
            ward_id: model.ward_id,
            created_by: model.created_by,
            assigned_to: model.assigned_to,
            resolution_remarks: model.resolution_remarks,
            priority,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
            resolved_at: model.resolved_at,
        })
    }
}

/// Convert StatusUpdateModel to StatusUpdate entity
impl TryFrom<StatusUpdateModel> for StatusUpdate {
    type Error = DomainError;

    fn try_from(model: StatusUpdateModel) -> Result<Self, Self::Error> {
        Ok(StatusUpdate {
            id: Snowflake::new(model.id),
            grievance_id: Snowflake::new(model.grievance_id),
            old_status: model
                .old_status
                .as_deref()
                .map(|s| parse_status("old_status", s))
                .transpose()?,
            new_status: parse_status("new_status", &model.new_status)?,
            remarks: model.remarks,
            updated_by: model.updated_by,
            created_at: model.created_at,
        })
    }
}

impl From<GrievanceStatsModel> for GrievanceStats {
    fn from(model: GrievanceStatsModel) -> Self {
        GrievanceStats {
            total: model.total,
            open: model.open,
            in_progress: model.in_progress,
            resolved: model.resolved,
            rejected: model.rejected,
            created_this_week: model.created_this_week,
            avg_resolution_days: model
                .avg_resolution_seconds
                .map(|seconds| GrievanceStats::round_days(seconds / 86_400.0)),
        }
    }
}

/// Grievance values bound by INSERT and UPDATE statements
pub struct GrievanceRow<'a> {
    pub id: i64,
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'static str,
    pub status: &'static str,
    pub photo_url: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ward_id: i32,
    pub created_by: &'a str,
    pub assigned_to: Option<&'a str>,
    pub resolution_remarks: Option<&'a str>,
    pub priority: Option<&'static str>,
    pub version: i64,
}

impl<'a> GrievanceRow<'a> {
    pub fn new(grievance: &'a Grievance) -> Self {
        Self {
            id: grievance.id.into_inner(),
            title: &grievance.title,
            description: &grievance.description,
            category: grievance.category.as_str(),
            status: grievance.status.as_str(),
            photo_url: grievance.photo_url.as_deref(),
            latitude: grievance.location.map(|l| l.latitude),
            longitude: grievance.location.map(|l| l.longitude),
            ward_id: grievance.ward_id,
            created_by: &grievance.created_by,
            assigned_to: grievance.assigned_to.as_deref(),
            resolution_remarks: grievance.resolution_remarks.as_deref(),
            priority: grievance.priority.map(Priority::as_str),
            version: grievance.version,
        }
    }
}
