//! Authentication extractor
//!
//! Verifies the identity provider's bearer token and yields the actor it
//! names.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejectionReason,
    TypedHeader,
};
use grievance_common::AppError;
use grievance_core::Actor;

use crate::response::ApiError;
use crate::state::AppState;

/// Caller identity extracted from a verified token
#[derive(Debug, Clone)]
pub struct AuthActor(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for AuthActor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    if matches!(rejection.reason(), TypedHeaderRejectionReason::Missing) {
                        ApiError::MissingAuth
                    } else {
                        ApiError::App(AppError::InvalidToken)
                    }
                })?;

        let app_state = AppState::from_ref(state);

        let actor = app_state.jwt_service().verify(bearer.token()).map_err(|e| {
            tracing::warn!(error = %e, "Rejected bearer token");
            ApiError::App(e)
        })?;

        Ok(AuthActor(actor))
    }
}
