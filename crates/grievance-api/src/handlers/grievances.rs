//! Grievance handlers
//!
//! Filing, status changes, priority, and scoped reads.

use axum::{extract::State, Json};
use grievance_core::GrievanceStats;
use grievance_service::{
    CreateGrievanceRequest, GrievanceResponse, GrievanceService, ListGrievancesQuery,
    PageResponse, SetPriorityRequest, StatusChangeResponse, StatusUpdateResponse,
    UpdateStatusRequest,
};

use crate::extractors::{ApiPath, AuthActor, GrievanceIdPath, ValidatedJson, ValidatedQuery};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// File a grievance in the caller's ward
///
/// POST /grievances
pub async fn create_grievance(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ValidatedJson(request): ValidatedJson<CreateGrievanceRequest>,
) -> ApiResult<Created<Json<GrievanceResponse>>> {
    let service = GrievanceService::new(state.service_context());
    let response = service.create(&actor, request).await?;
    Ok(Created(Json(response)))
}

/// List grievances visible to the caller
///
/// GET /grievances
pub async fn list_grievances(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ValidatedQuery(query): ValidatedQuery<ListGrievancesQuery>,
) -> ApiResult<Json<PageResponse<GrievanceResponse>>> {
    let service = GrievanceService::new(state.service_context());
    let page = service.list(&actor, query).await?;
    Ok(Json(page))
}

/// Dashboard counts over the caller's scope
///
/// GET /grievances/stats
pub async fn grievance_stats(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> ApiResult<Json<GrievanceStats>> {
    let service = GrievanceService::new(state.service_context());
    let stats = service.stats(&actor).await?;
    Ok(Json(stats))
}

/// GET /grievances/{grievance_id}
pub async fn get_grievance(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiPath(path): ApiPath<GrievanceIdPath>,
) -> ApiResult<Json<GrievanceResponse>> {
    let grievance_id = path.grievance_id()?;

    let service = GrievanceService::new(state.service_context());
    let response = service.get(&actor, grievance_id).await?;
    Ok(Json(response))
}

/// Status history, oldest first
///
/// GET /grievances/{grievance_id}/history
pub async fn get_history(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiPath(path): ApiPath<GrievanceIdPath>,
) -> ApiResult<Json<Vec<StatusUpdateResponse>>> {
    let grievance_id = path.grievance_id()?;

    let service = GrievanceService::new(state.service_context());
    let history = service.history(&actor, grievance_id).await?;
    Ok(Json(history))
}

/// Move a grievance to a new status
///
/// PUT /grievances/{grievance_id}/status
pub async fn update_status(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiPath(path): ApiPath<GrievanceIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<Json<StatusChangeResponse>> {
    let grievance_id = path.grievance_id()?;

    let service = GrievanceService::new(state.service_context());
    let response = service.update_status(&actor, grievance_id, request).await?;
    Ok(Json(response))
}

/// Set or clear the priority
///
/// PUT /grievances/{grievance_id}/priority
pub async fn set_priority(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ApiPath(path): ApiPath<GrievanceIdPath>,
    ValidatedJson(request): ValidatedJson<SetPriorityRequest>,
) -> ApiResult<Json<GrievanceResponse>> {
    let grievance_id = path.grievance_id()?;

    let service = GrievanceService::new(state.service_context());
    let response = service.set_priority(&actor, grievance_id, request).await?;
    Ok(Json(response))
}
