//! Visibility scope and list filtering

use std::cmp::Ordering;

use crate::entities::{Grievance, GrievanceCategory, GrievanceStatus, Priority};
use crate::value_objects::{Actor, ActorRole};

/// Which grievances an actor may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrievanceScope {
    /// Grievances filed by this citizen
    Citizen(String),
    /// Grievances in this ward
    Ward(i32),
    /// Nothing at all
    Nothing,
}

impl GrievanceScope {
    pub fn for_actor(actor: &Actor) -> Self {
        match (actor.role, actor.ward_id) {
            (ActorRole::Citizen, _) => Self::Citizen(actor.id.clone()),
            (ActorRole::Nagarasevaka, Some(ward_id)) => Self::Ward(ward_id),
            (ActorRole::Nagarasevaka, None) => Self::Nothing,
        }
    }

    pub fn contains(&self, grievance: &Grievance) -> bool {
        match self {
            Self::Citizen(id) => grievance.created_by == *id,
            Self::Ward(ward_id) => grievance.ward_id == *ward_id,
            Self::Nothing => false,
        }
    }
}

/// List ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    /// High, medium, low, unset; ties newest first
    Priority,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            "priority" => Some(Self::Priority),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Priority => "priority",
        }
    }

    /// Total order over grievances; ends on `id` so paging is stable
    pub fn compare(self, a: &Grievance, b: &Grievance) -> Ordering {
        let newest = |a: &Grievance, b: &Grievance| {
            b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
        };
        match self {
            Self::Newest => newest(a, b),
            Self::Oldest => a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)),
            Self::Priority => Priority::rank(a.priority)
                .cmp(&Priority::rank(b.priority))
                .then_with(|| newest(a, b)),
        }
    }
}

/// List filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrievanceFilter {
    pub status: Option<GrievanceStatus>,
    pub category: Option<GrievanceCategory>,
    /// Lowercased, trimmed search text; `None` when blank
    search: Option<String>,
    pub sort: SortKey,
}

impl GrievanceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: GrievanceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_category(mut self, category: GrievanceCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_search(mut self, text: &str) -> Self {
        let text = text.trim();
        self.search = (!text.is_empty()).then(|| text.to_lowercase());
        self
    }

    pub fn sorted_by(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn matches(&self, grievance: &Grievance) -> bool {
        self.status.is_none_or(|status| grievance.status == status)
            && self.category.is_none_or(|category| grievance.category == category)
            && self
                .search
                .as_deref()
                .is_none_or(|needle| grievance.matches_search(needle))
    }
}
