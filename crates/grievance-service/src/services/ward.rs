//! Ward service
//!
//! Read-only access to ward reference data.

use grievance_core::DomainError;
use tracing::instrument;

use crate::dto::WardResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Ward service
pub struct WardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> WardService<'a> {
    /// Create a new WardService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// All wards ordered by id
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<WardResponse>> {
        let wards = self.ctx.ward_repo().list().await?;
        Ok(wards.into_iter().map(WardResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, ward_id: i32) -> ServiceResult<WardResponse> {
        let ward = self
            .ctx
            .ward_repo()
            .find_by_id(ward_id)
            .await?
            .ok_or(DomainError::WardNotFound(ward_id))?;
        Ok(WardResponse::from(ward))
    }
}
