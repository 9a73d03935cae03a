//! Actor - the authenticated caller of a lifecycle operation
//!
//! Actors are produced by the external identity provider; the core only
//! reads their id, role, and ward assignment.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// Resident who files grievances
    Citizen,
    /// Ward representative who triages and resolves grievances
    Nagarasevaka,
}

impl ActorRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Citizen => "citizen",
            Self::Nagarasevaka => "nagarasevaka",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "citizen" => Some(Self::Citizen),
            "nagarasevaka" => Some(Self::Nagarasevaka),
            _ => None,
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: ActorRole,
    pub ward_id: Option<i32>,
}

impl Actor {
    pub fn citizen(id: impl Into<String>, ward_id: i32) -> Self {
        Self {
            id: id.into(),
            role: ActorRole::Citizen,
            ward_id: Some(ward_id),
        }
    }

    pub fn nagarasevaka(id: impl Into<String>, ward_id: i32) -> Self {
        Self {
            id: id.into(),
            role: ActorRole::Nagarasevaka,
            ward_id: Some(ward_id),
        }
    }

    #[inline]
    pub fn is_citizen(&self) -> bool {
        self.role == ActorRole::Citizen
    }

    #[inline]
    pub fn is_ward_representative(&self) -> bool {
        self.role == ActorRole::Nagarasevaka
    }
}
