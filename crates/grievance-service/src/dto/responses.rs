//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use grievance_core::{GrievanceCategory, GrievanceStatus, Priority};
use serde::Serialize;

// ============================================================================
// Grievance Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrievanceResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: GrievanceCategory,
    pub status: GrievanceStatus,
    pub photo_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ward_id: i32,
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub resolution_remarks: Option<String>,
    pub priority: Option<Priority>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// One history entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdateResponse {
    pub id: String,
    pub grievance_id: String,
    /// `null` for the creation entry
    pub old_status: Option<GrievanceStatus>,
    pub new_status: GrievanceStatus,
    pub remarks: Option<String>,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
}

/// Result of a status change: the new state and the entry that produced it
#[derive(Debug, Clone, Serialize)]
pub struct StatusChangeResponse {
    pub grievance: GrievanceResponse,
    pub status_update: StatusUpdateResponse,
}

/// Offset-paged list
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
    pub has_more: bool,
    /// 1-based position of the first item, 0 when empty
    pub first: i64,
    /// 1-based position of the last item, 0 when empty
    pub last: i64,
}

// ============================================================================
// Ward Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct WardResponse {
    pub id: i32,
    pub name: String,
    pub area_name: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub storage: String,
}

impl ReadinessResponse {
    pub fn ready(storage_healthy: bool) -> Self {
        Self {
            status: if storage_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                storage: if storage_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
