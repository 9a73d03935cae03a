//! Ward entity - administrative subdivision a grievance belongs to

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ward reference data, maintained outside this service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ward {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub area_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Ward {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            area_name: None,
            description: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_area(mut self, area_name: impl Into<String>) -> Self {
        self.area_name = Some(area_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
