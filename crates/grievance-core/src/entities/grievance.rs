//! Grievance entity - a citizen-submitted civic complaint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Snowflake;

/// Lifecycle status of a grievance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GrievanceStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Rejected,
}

impl GrievanceStatus {
    pub const ALL: [Self; 4] = [Self::Open, Self::InProgress, Self::Resolved, Self::Rejected];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl fmt::Display for GrievanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complaint category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrievanceCategory {
    Pothole,
    Garbage,
    WaterLeak,
    StreetLight,
    Drainage,
    Other,
}

impl GrievanceCategory {
    pub const ALL: [Self; 6] = [
        Self::Pothole,
        Self::Garbage,
        Self::WaterLeak,
        Self::StreetLight,
        Self::Drainage,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pothole => "pothole",
            Self::Garbage => "garbage",
            Self::WaterLeak => "water_leak",
            Self::StreetLight => "street_light",
            Self::Drainage => "drainage",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == s)
    }
}

impl fmt::Display for GrievanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage priority assigned by the ward office
///
/// Declaration order is the sort order: high first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|priority| priority.as_str() == s)
    }

    /// Sort rank; unset priority sorts after `Low`
    pub fn rank(priority: Option<Self>) -> u8 {
        match priority {
            Some(Self::High) => 0,
            Some(Self::Medium) => 1,
            Some(Self::Low) => 2,
            None => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic point where the issue was observed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Grievance entity
#[derive(Debug, Clone, PartialEq)]
pub struct Grievance {
    pub id: Snowflake,
    pub title: String,
    pub description: String,
    pub category: GrievanceCategory,
    pub status: GrievanceStatus,
    pub photo_url: Option<String>,
    pub location: Option<Location>,
    pub ward_id: i32,
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub resolution_remarks: Option<String>,
    pub priority: Option<Priority>,
    /// Optimistic concurrency token, bumped on every persisted change
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Grievance {
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.status == GrievanceStatus::Resolved
    }

    /// Days between filing and resolution, if resolved
    pub fn resolution_days(&self) -> Option<f64> {
        self.resolved_at
            .map(|resolved| (resolved - self.created_at).num_seconds() as f64 / 86_400.0)
    }

    /// Case-insensitive match of `needle` (already lowercased) against
    /// title, description, and the decimal id
    pub fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.id.to_string().contains(needle)
    }
}
