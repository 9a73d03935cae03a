//! # grievance-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use dto::{
    CreateGrievanceRequest, GrievanceResponse, HealthResponse, ListGrievancesQuery, PageResponse,
    ReadinessResponse, SetPriorityRequest, StatusChangeResponse, StatusUpdateResponse,
    UpdateStatusRequest, WardResponse,
};
pub use services::{
    GrievanceService, HealthService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, WardService,
};
