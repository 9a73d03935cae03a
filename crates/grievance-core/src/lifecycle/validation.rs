//! Input validation for new grievances and status remarks
//!
//! Every check runs and all failures are reported together.

use crate::entities::{GrievanceCategory, Location};
use crate::error::Violations;

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MIN_CHARS: usize = 20;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const REMARKS_MAX_CHARS: usize = 500;
pub const PHOTO_URL_MAX_CHARS: usize = 2048;

/// Unvalidated creation input, as received from the caller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrievanceDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub photo_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Creation input that passed validation; text is trimmed
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub title: String,
    pub description: String,
    pub category: GrievanceCategory,
    pub photo_url: Option<String>,
    pub location: Option<Location>,
}

pub fn validate_draft(draft: &GrievanceDraft) -> Result<ValidDraft, Violations> {
    let mut violations = Violations::new();

    let title = draft.title.trim();
    check_length(
        &mut violations,
        "title",
        title,
        TITLE_MIN_CHARS,
        TITLE_MAX_CHARS,
    );

    let description = draft.description.trim();
    check_length(
        &mut violations,
        "description",
        description,
        DESCRIPTION_MIN_CHARS,
        DESCRIPTION_MAX_CHARS,
    );

    let category = GrievanceCategory::parse(draft.category.trim());
    if category.is_none() {
        violations.push(
            "category",
            format!("unknown category '{}'", draft.category.trim()),
        );
    }

    let photo_url = draft
        .photo_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());
    if let Some(url) = photo_url {
        if url.chars().count() > PHOTO_URL_MAX_CHARS {
            violations.push(
                "photo_url",
                format!("must be at most {PHOTO_URL_MAX_CHARS} characters"),
            );
        }
    }

    let location = validate_location(&mut violations, draft.latitude, draft.longitude);

    match category {
        Some(category) if violations.is_empty() => Ok(ValidDraft {
            title: title.to_string(),
            description: description.to_string(),
            category,
            photo_url: photo_url.map(str::to_string),
            location,
        }),
        _ => Err(violations),
    }
}

/// Trim remarks and check their length; blank remarks become `None`
pub fn normalize_remarks(
    violations: &mut Violations,
    remarks: Option<&str>,
) -> Option<String> {
    let trimmed = remarks.map(str::trim).filter(|r| !r.is_empty())?;
    if trimmed.chars().count() > REMARKS_MAX_CHARS {
        violations.push(
            "remarks",
            format!("must be at most {REMARKS_MAX_CHARS} characters"),
        );
    }
    Some(trimmed.to_string())
}

fn check_length(violations: &mut Violations, field: &str, value: &str, min: usize, max: usize) {
    let len = value.chars().count();
    if len < min || len > max {
        violations.push(field, format!("must be between {min} and {max} characters"));
    }
}

fn validate_location(
    violations: &mut Violations,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Option<Location> {
    match (latitude, longitude) {
        (None, None) => None,
        (Some(latitude), Some(longitude)) => {
            let mut in_range = true;
            if !(-90.0..=90.0).contains(&latitude) {
                violations.push("latitude", "must be between -90 and 90");
                in_range = false;
            }
            if !(-180.0..=180.0).contains(&longitude) {
                violations.push("longitude", "must be between -180 and 180");
                in_range = false;
            }
            in_range.then_some(Location {
                latitude,
                longitude,
            })
        }
        _ => {
            violations.push("location", "latitude and longitude must be provided together");
            None
        }
    }
}
