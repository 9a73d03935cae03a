//! Grievance service
//!
//! Filing, status changes, priority, and scoped reads. Lifecycle rules live
//! in `grievance_core::lifecycle`; this service sequences role checks,
//! lookups, and the version-checked writes around them.

use grievance_core::entities::{Grievance, GrievanceCategory, GrievanceStatus};
use grievance_core::lifecycle::{open_grievance, EntryStamp, GrievanceDraft};
use grievance_core::query::{GrievanceFilter, GrievanceScope, GrievanceStats, SortKey};
use grievance_core::{Actor, DomainError, Snowflake, Violations};
use tracing::{debug, info, instrument};

use crate::dto::{
    CreateGrievanceRequest, GrievanceResponse, ListGrievancesQuery, PageResponse,
    SetPriorityRequest, StatusChangeResponse, StatusUpdateResponse, UpdateStatusRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Grievance service
pub struct GrievanceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GrievanceService<'a> {
    /// Create a new GrievanceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// File a new grievance in the citizen's ward
    #[instrument(skip(self, actor, request), fields(actor_id = %actor.id))]
    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateGrievanceRequest,
    ) -> ServiceResult<GrievanceResponse> {
        let draft = GrievanceDraft::from(request);
        let grievance_id = self.ctx.generate_id();
        let stamp = EntryStamp::new(self.ctx.generate_id(), self.ctx.now());

        let created = open_grievance(actor, &draft, grievance_id, stamp).inspect_err(|e| {
            debug!(error = %e, "Grievance rejected");
        })?;
        self.ctx.grievance_repo().create(&created).await?;

        info!(
            grievance_id = %created.grievance.id,
            ward_id = created.grievance.ward_id,
            category = %created.grievance.category,
            "Grievance filed"
        );

        Ok(GrievanceResponse::from(created.grievance))
    }

    /// Move a grievance to `request.status`
    ///
    /// The role check runs before the lookup, and a grievance outside the
    /// actor's ward is reported exactly like a missing one.
    #[instrument(skip(self, actor, request), fields(actor_id = %actor.id))]
    pub async fn update_status(
        &self,
        actor: &Actor,
        grievance_id: Snowflake,
        request: UpdateStatusRequest,
    ) -> ServiceResult<StatusChangeResponse> {
        Self::require_ward_representative(actor, "update status")?;
        let current = self.find_in_ward(actor, grievance_id).await?;

        let stamp = EntryStamp::new(self.ctx.generate_id(), self.ctx.now());
        let transition = self
            .ctx
            .lifecycle()
            .apply(
                &current,
                actor,
                &request.status,
                request.remarks.as_deref(),
                stamp,
            )
            .inspect_err(|e| {
                debug!(grievance_id = %grievance_id, error = %e, "Status change rejected");
            })?;

        self.ctx
            .grievance_repo()
            .apply_transition(&transition, current.version)
            .await?;

        info!(
            grievance_id = %grievance_id,
            ward_id = current.ward_id,
            old_status = %current.status,
            new_status = %transition.grievance.status,
            "Grievance status updated"
        );

        Ok(StatusChangeResponse::from(&transition))
    }

    /// Set or clear the priority; no history entry is written
    #[instrument(skip(self, actor, request), fields(actor_id = %actor.id))]
    pub async fn set_priority(
        &self,
        actor: &Actor,
        grievance_id: Snowflake,
        request: SetPriorityRequest,
    ) -> ServiceResult<GrievanceResponse> {
        Self::require_ward_representative(actor, "set priority")?;
        let current = self.find_in_ward(actor, grievance_id).await?;

        let mut updated = current.clone();
        updated.priority = request.priority();
        updated.updated_at = self.ctx.now().max(current.updated_at);
        updated.version += 1;

        self.ctx
            .grievance_repo()
            .save(&updated, current.version)
            .await?;

        info!(
            grievance_id = %grievance_id,
            ward_id = current.ward_id,
            priority = updated.priority.map_or("none", |p| p.as_str()),
            "Grievance priority set"
        );

        Ok(GrievanceResponse::from(updated))
    }

    /// Filtered page of the grievances visible to `actor`
    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn list(
        &self,
        actor: &Actor,
        query: ListGrievancesQuery,
    ) -> ServiceResult<PageResponse<GrievanceResponse>> {
        let filter = Self::parse_filter(&query)?;
        let page = self.ctx.page_limits().resolve(query.offset, query.limit);

        let results = self
            .ctx
            .grievance_repo()
            .list(&GrievanceScope::for_actor(actor), &filter, page)
            .await?;

        Ok(results.into())
    }

    /// Get a visible grievance
    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn get(&self, actor: &Actor, grievance_id: Snowflake) -> ServiceResult<GrievanceResponse> {
        let grievance = self.find_visible(actor, grievance_id).await?;
        Ok(GrievanceResponse::from(grievance))
    }

    /// Full history of a visible grievance, oldest first
    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn history(
        &self,
        actor: &Actor,
        grievance_id: Snowflake,
    ) -> ServiceResult<Vec<StatusUpdateResponse>> {
        self.find_visible(actor, grievance_id).await?;
        let entries = self.ctx.grievance_repo().history(grievance_id).await?;
        Ok(entries.into_iter().map(StatusUpdateResponse::from).collect())
    }

    /// Dashboard statistics over the actor's scope
    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn stats(&self, actor: &Actor) -> ServiceResult<GrievanceStats> {
        let stats = self
            .ctx
            .grievance_repo()
            .stats(&GrievanceScope::for_actor(actor), self.ctx.now())
            .await?;
        Ok(stats)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn require_ward_representative(actor: &Actor, action: &str) -> Result<(), DomainError> {
        if actor.is_ward_representative() {
            Ok(())
        } else {
            debug!(actor_id = %actor.id, action, "Role check failed");
            Err(DomainError::Forbidden(format!(
                "only ward representatives may {action}"
            )))
        }
    }

    async fn find_visible(&self, actor: &Actor, grievance_id: Snowflake) -> ServiceResult<Grievance> {
        let scope = GrievanceScope::for_actor(actor);
        let grievance = self
            .ctx
            .grievance_repo()
            .find_by_id(grievance_id)
            .await?
            .filter(|g| scope.contains(g))
            .ok_or(DomainError::GrievanceNotFound(grievance_id))?;
        Ok(grievance)
    }

    async fn find_in_ward(&self, actor: &Actor, grievance_id: Snowflake) -> ServiceResult<Grievance> {
        let grievance = self
            .ctx
            .grievance_repo()
            .find_by_id(grievance_id)
            .await?
            .filter(|g| actor.ward_id == Some(g.ward_id))
            .ok_or(DomainError::GrievanceNotFound(grievance_id))?;
        Ok(grievance)
    }

    /// All malformed filter values are reported together
    fn parse_filter(query: &ListGrievancesQuery) -> Result<GrievanceFilter, DomainError> {
        let mut violations = Violations::new();
        let mut filter = GrievanceFilter::new();

        if let Some(raw) = non_blank(query.status.as_deref()) {
            match GrievanceStatus::parse(raw) {
                Some(status) => filter = filter.with_status(status),
                None => violations.push("status", format!("unknown status '{raw}'")),
            }
        }
        if let Some(raw) = non_blank(query.category.as_deref()) {
            match GrievanceCategory::parse(raw) {
                Some(category) => filter = filter.with_category(category),
                None => violations.push("category", format!("unknown category '{raw}'")),
            }
        }
        if let Some(raw) = non_blank(query.sort.as_deref()) {
            match SortKey::parse(raw) {
                Some(sort) => filter = filter.sorted_by(sort),
                None => violations.push("sort", format!("unknown sort '{raw}'")),
            }
        }
        if let Some(q) = query.q.as_deref() {
            filter = filter.with_search(q);
        }

        if violations.is_empty() {
            Ok(filter)
        } else {
            Err(DomainError::Validation(violations))
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
