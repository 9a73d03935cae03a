//! Ward handlers

use axum::{extract::State, Json};
use grievance_service::{WardResponse, WardService};

use crate::extractors::{ApiPath, AuthActor, WardIdPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /wards
pub async fn list_wards(
    State(state): State<AppState>,
    _actor: AuthActor,
) -> ApiResult<Json<Vec<WardResponse>>> {
    let wards = WardService::new(state.service_context()).list().await?;
    Ok(Json(wards))
}

/// GET /wards/{ward_id}
pub async fn get_ward(
    State(state): State<AppState>,
    _actor: AuthActor,
    ApiPath(path): ApiPath<WardIdPath>,
) -> ApiResult<Json<WardResponse>> {
    let ward_id = path.ward_id()?;

    let ward = WardService::new(state.service_context()).get(ward_id).await?;
    Ok(Json(ward))
}
