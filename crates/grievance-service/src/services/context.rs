//! Service context - dependency container for services
//!
//! Holds the repositories, lifecycle policy, and other dependencies needed
//! by services.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use grievance_common::auth::JwtService;
use grievance_core::lifecycle::LifecyclePolicy;
use grievance_core::query::PageLimits;
use grievance_core::traits::{GrievanceRepository, WardRepository};
use grievance_core::{Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Services borrow the context per request. It provides access to:
/// - Grievance and ward repositories
/// - The lifecycle policy (transition table, same-status handling)
/// - Page size limits
/// - JWT service for verifying actor tokens
/// - Snowflake generator for ID generation
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    grievance_repo: Arc<dyn GrievanceRepository>,
    ward_repo: Arc<dyn WardRepository>,

    // Policy
    lifecycle: LifecyclePolicy,
    page_limits: PageLimits,

    // Services
    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        grievance_repo: Arc<dyn GrievanceRepository>,
        ward_repo: Arc<dyn WardRepository>,
        lifecycle: LifecyclePolicy,
        page_limits: PageLimits,
        jwt_service: Arc<JwtService>,
        snowflake_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            grievance_repo,
            ward_repo,
            lifecycle,
            page_limits,
            jwt_service,
            snowflake_generator,
        }
    }

    // === Repositories ===

    /// Get the grievance repository
    pub fn grievance_repo(&self) -> &dyn GrievanceRepository {
        self.grievance_repo.as_ref()
    }

    /// Get the ward repository
    pub fn ward_repo(&self) -> &dyn WardRepository {
        self.ward_repo.as_ref()
    }

    // === Policy ===

    pub fn lifecycle(&self) -> &LifecyclePolicy {
        &self.lifecycle
    }

    pub fn page_limits(&self) -> PageLimits {
        self.page_limits
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    /// Current time at the precision storage keeps (microseconds), so a
    /// value handed back to a caller equals the one read back later
    pub fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("lifecycle", &self.lifecycle)
            .field("page_limits", &self.page_limits)
            .field("snowflake_generator", &self.snowflake_generator)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext with custom configuration
///
/// Policy, paging, and ID generation fall back to defaults; repositories and
/// the JWT service are required.
#[derive(Default)]
pub struct ServiceContextBuilder {
    grievance_repo: Option<Arc<dyn GrievanceRepository>>,
    ward_repo: Option<Arc<dyn WardRepository>>,
    lifecycle: Option<LifecyclePolicy>,
    page_limits: Option<PageLimits>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grievance_repo(mut self, repo: Arc<dyn GrievanceRepository>) -> Self {
        self.grievance_repo = Some(repo);
        self
    }

    pub fn ward_repo(mut self, repo: Arc<dyn WardRepository>) -> Self {
        self.ward_repo = Some(repo);
        self
    }

    pub fn lifecycle(mut self, policy: LifecyclePolicy) -> Self {
        self.lifecycle = Some(policy);
        self
    }

    pub fn page_limits(mut self, limits: PageLimits) -> Self {
        self.page_limits = Some(limits);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.grievance_repo
                .ok_or_else(|| ServiceError::validation("grievance_repo is required"))?,
            self.ward_repo
                .ok_or_else(|| ServiceError::validation("ward_repo is required"))?,
            self.lifecycle.unwrap_or_default(),
            self.page_limits.unwrap_or_default(),
            self.jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            self.snowflake_generator.unwrap_or_default(),
        ))
    }
}
