//! Test fixtures and data generators
//!
//! Request bodies, well-known actors, and response shapes.

use grievance_core::Actor;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

// ============================================================================
// Actors
// ============================================================================

/// Citizen `u1` living in ward 5
pub fn citizen_u1() -> Actor {
    Actor::citizen("u1", 5)
}

/// Ward 5 representative
pub fn ward_rep_w1() -> Actor {
    Actor::nagarasevaka("w1", 5)
}

/// Ward 9 representative
pub fn ward_rep_w2() -> Actor {
    Actor::nagarasevaka("w2", 9)
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct NewGrievance {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl NewGrievance {
    pub fn pothole() -> Self {
        Self {
            title: format!("Pothole on MG Road #{}", unique_suffix()),
            description: "Deep pothole near the bus stop, two-wheelers keep skidding".to_string(),
            category: "pothole".to_string(),
            photo_url: None,
            latitude: Some(18.5204),
            longitude: Some(73.8567),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl StatusChange {
    pub fn to(status: &str, remarks: &str) -> Self {
        Self {
            status: status.to_string(),
            remarks: Some(remarks.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PriorityChange {
    pub priority: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GrievanceBody {
    pub id: String,
    pub title: String,
    pub category: String,
    pub status: String,
    pub ward_id: i32,
    pub created_by: String,
    pub resolution_remarks: Option<String>,
    pub priority: Option<String>,
    pub version: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: String,
    pub resolved_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateBody {
    pub id: String,
    pub grievance_id: String,
    pub old_status: Option<String>,
    pub new_status: String,
    pub remarks: Option<String>,
    pub updated_by: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeBody {
    pub grievance: GrievanceBody,
    pub status_update: StatusUpdateBody,
}

#[derive(Debug, Deserialize)]
pub struct PageBody<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
    pub has_more: bool,
    pub first: i64,
    pub last: i64,
}

#[derive(Debug, Deserialize)]
pub struct WardBody {
    pub id: i32,
    pub name: String,
    pub area_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatsBody {
    pub total: i64,
    pub open: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub rejected: i64,
    pub created_this_week: i64,
    pub avg_resolution_days: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Fields named in `details`, in order
    pub fn fields(&self) -> Vec<String> {
        self.details
            .as_ref()
            .and_then(|d| d.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v["field"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
