//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use grievance_core::Snowflake;
use serde::de::DeserializeOwned;

use crate::response::ApiError;

/// `Path` whose rejection is an `ApiError`
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        Ok(ApiPath(inner))
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct GrievanceIdPath {
    pub grievance_id: String,
}

impl GrievanceIdPath {
    pub fn grievance_id(&self) -> Result<Snowflake, ApiError> {
        self.grievance_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid grievance_id format"))
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct WardIdPath {
    pub ward_id: String,
}

impl WardIdPath {
    pub fn ward_id(&self) -> Result<i32, ApiError> {
        self.ward_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid ward_id format"))
    }
}
