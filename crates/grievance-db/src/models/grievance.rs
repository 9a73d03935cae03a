//! Grievance database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for grievances table
#[derive(Debug, Clone, FromRow)]
pub struct GrievanceModel {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub photo_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ward_id: i32,
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub resolution_remarks: Option<String>,
    pub priority: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Database model for grievance_status_updates table
#[derive(Debug, Clone, FromRow)]
pub struct StatusUpdateModel {
    pub id: i64,
    pub grievance_id: i64,
    pub old_status: Option<String>,
    pub new_status: String,
    pub remarks: Option<String>,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregate row for dashboard statistics
#[derive(Debug, Clone, FromRow)]
pub struct GrievanceStatsModel {
    pub total: i64,
    pub open: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub rejected: i64,
    pub created_this_week: i64,
    pub avg_resolution_seconds: Option<f64>,
}
