//! Health service
//!
//! Dependency checks behind the readiness probe.

use tracing::warn;

use crate::dto::ReadinessResponse;

use super::context::ServiceContext;

/// Health service
pub struct HealthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> HealthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check that the grievance store answers
    pub async fn readiness(&self) -> ReadinessResponse {
        let storage_healthy = match self.ctx.grievance_repo().ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Storage health check failed");
                false
            }
        };
        ReadinessResponse::ready(storage_healthy)
    }
}
