//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use grievance_core::entities::{Grievance, StatusUpdate, Ward};
use grievance_core::lifecycle::Transition;
use grievance_core::query::Page;

use super::responses::{
    GrievanceResponse, PageResponse, StatusChangeResponse, StatusUpdateResponse, WardResponse,
};

// ============================================================================
// Grievance Mappers
// ============================================================================

impl From<&Grievance> for GrievanceResponse {
    fn from(grievance: &Grievance) -> Self {
        Self {
            id: grievance.id.to_string(),
            title: grievance.title.clone(),
            description: grievance.description.clone(),
            category: grievance.category,
            status: grievance.status,
            photo_url: grievance.photo_url.clone(),
            latitude: grievance.location.map(|l| l.latitude),
            longitude: grievance.location.map(|l| l.longitude),
            ward_id: grievance.ward_id,
            created_by: grievance.created_by.clone(),
            assigned_to: grievance.assigned_to.clone(),
            resolution_remarks: grievance.resolution_remarks.clone(),
            priority: grievance.priority,
            version: grievance.version,
            created_at: grievance.created_at,
            updated_at: grievance.updated_at,
            resolved_at: grievance.resolved_at,
        }
    }
}

impl From<Grievance> for GrievanceResponse {
    fn from(grievance: Grievance) -> Self {
        Self::from(&grievance)
    }
}

impl From<&StatusUpdate> for StatusUpdateResponse {
    fn from(entry: &StatusUpdate) -> Self {
        Self {
            id: entry.id.to_string(),
            grievance_id: entry.grievance_id.to_string(),
            old_status: entry.old_status,
            new_status: entry.new_status,
            remarks: entry.remarks.clone(),
            updated_by: entry.updated_by.clone(),
            created_at: entry.created_at,
        }
    }
}

impl From<StatusUpdate> for StatusUpdateResponse {
    fn from(entry: StatusUpdate) -> Self {
        Self::from(&entry)
    }
}

impl From<&Transition> for StatusChangeResponse {
    fn from(transition: &Transition) -> Self {
        Self {
            grievance: GrievanceResponse::from(&transition.grievance),
            status_update: StatusUpdateResponse::from(&transition.entry),
        }
    }
}

impl<T, U: From<T>> From<Page<T>> for PageResponse<U> {
    fn from(page: Page<T>) -> Self {
        let has_more = page.has_more();
        let first = page.first();
        let last = page.last();
        Self {
            items: page.items.into_iter().map(U::from).collect(),
            total: page.total,
            offset: page.offset,
            limit: page.limit,
            has_more,
            first,
            last,
        }
    }
}

// ============================================================================
// Ward Mappers
// ============================================================================

impl From<&Ward> for WardResponse {
    fn from(ward: &Ward) -> Self {
        Self {
            id: ward.id,
            name: ward.name.clone(),
            area_name: ward.area_name.clone(),
            description: ward.description.clone(),
            created_at: ward.created_at,
        }
    }
}

impl From<Ward> for WardResponse {
    fn from(ward: Ward) -> Self {
        Self::from(&ward)
    }
}
