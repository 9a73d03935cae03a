//! Request DTOs for API endpoints
//!
//! Request DTOs implement `Deserialize` and `Validate`. The derives only
//! catch malformed payloads; lifecycle rules (lengths after trimming, enum
//! membership, remarks) are checked in the core so every violated field is
//! reported in one response.

use grievance_core::lifecycle::GrievanceDraft;
use grievance_core::Priority;
use serde::Deserialize;
use validator::{Validate, ValidationError};

// ============================================================================
// Grievance Requests
// ============================================================================

/// File a new grievance
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateGrievanceRequest {
    #[validate(length(max = 10_000, message = "title is too large"))]
    pub title: String,

    #[validate(length(max = 10_000, message = "description is too large"))]
    pub description: String,

    /// One of `pothole`, `garbage`, `water_leak`, `street_light`, `drainage`, `other`
    pub category: String,

    #[validate(length(max = 10_000, message = "photo_url is too large"))]
    pub photo_url: Option<String>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<CreateGrievanceRequest> for GrievanceDraft {
    fn from(request: CreateGrievanceRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            category: request.category,
            photo_url: request.photo_url,
            latitude: request.latitude,
            longitude: request.longitude,
        }
    }
}

/// Move a grievance to another status
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateStatusRequest {
    /// One of `open`, `in_progress`, `resolved`, `rejected`
    pub status: String,

    #[validate(length(max = 10_000, message = "remarks are too large"))]
    pub remarks: Option<String>,
}

/// Set or clear a grievance's priority; `null` clears it
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SetPriorityRequest {
    #[validate(custom(function = "validate_priority"))]
    pub priority: Option<String>,
}

impl SetPriorityRequest {
    /// Parsed priority; call after validation
    pub fn priority(&self) -> Option<Priority> {
        self.priority.as_deref().and_then(Priority::parse)
    }
}

fn validate_priority(value: &str) -> Result<(), ValidationError> {
    if Priority::parse(value).is_some() {
        Ok(())
    } else {
        let mut error = ValidationError::new("priority");
        error.message = Some("priority must be one of high, medium, low".into());
        Err(error)
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// `GET /grievances` query string
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ListGrievancesQuery {
    pub status: Option<String>,
    pub category: Option<String>,

    /// Free-text search over title, description, and id
    #[validate(length(max = 200, message = "search text is too long"))]
    pub q: Option<String>,

    /// `newest` (default), `oldest`, or `priority`
    pub sort: Option<String>,

    pub offset: Option<i64>,
    pub limit: Option<i64>,
}
