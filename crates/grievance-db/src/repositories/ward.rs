//! PostgreSQL implementation of WardRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use grievance_core::entities::Ward;
use grievance_core::traits::{RepoResult, WardRepository};

use crate::models::WardModel;

use super::error::map_db_error;

/// PostgreSQL implementation of WardRepository
#[derive(Clone)]
pub struct PgWardRepository {
    pool: PgPool,
}

impl PgWardRepository {
    /// Create a new PgWardRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WardRepository for PgWardRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> RepoResult<Vec<Ward>> {
        let results = sqlx::query_as::<_, WardModel>(
            r"
            SELECT id, name, area_name, description, created_at
            FROM wards
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Ward::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> RepoResult<Option<Ward>> {
        let result = sqlx::query_as::<_, WardModel>(
            r"
            SELECT id, name, area_name, description, created_at
            FROM wards
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Ward::from))
    }
}
