//! Dashboard statistics over a scope

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::entities::{Grievance, GrievanceStatus};

/// Counts and averages shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GrievanceStats {
    pub total: i64,
    pub open: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub rejected: i64,
    /// Filed within the last seven days
    pub created_this_week: i64,
    /// Mean filing-to-resolution time of resolved grievances, one decimal
    pub avg_resolution_days: Option<f64>,
}

impl GrievanceStats {
    /// Start of the "this week" window
    pub fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(7)
    }

    pub fn from_grievances<'a>(
        grievances: impl IntoIterator<Item = &'a Grievance>,
        now: DateTime<Utc>,
    ) -> Self {
        let week_start = Self::week_start(now);
        let mut stats = Self::default();
        let mut resolution_days = Vec::new();

        for grievance in grievances {
            stats.total += 1;
            match grievance.status {
                GrievanceStatus::Open => stats.open += 1,
                GrievanceStatus::InProgress => stats.in_progress += 1,
                GrievanceStatus::Resolved => stats.resolved += 1,
                GrievanceStatus::Rejected => stats.rejected += 1,
            }
            if grievance.created_at >= week_start {
                stats.created_this_week += 1;
            }
            if let Some(days) = grievance.resolution_days() {
                resolution_days.push(days);
            }
        }

        stats.avg_resolution_days = Self::average_days(&resolution_days);
        stats
    }

    /// Mean rounded to one decimal, `None` for no samples
    pub fn average_days(samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        Some(Self::round_days(mean))
    }

    pub fn round_days(days: f64) -> f64 {
        (days * 10.0).round() / 10.0
    }
}
