//! Ward database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for wards table
#[derive(Debug, Clone, FromRow)]
pub struct WardModel {
    pub id: i32,
    pub name: String,
    pub area_name: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
