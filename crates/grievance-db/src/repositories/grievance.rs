//! PostgreSQL implementation of GrievanceRepository
//!
//! Grievance rows and their history rows are written in one transaction.
//! Updates are compare-and-swap on `version`: zero affected rows means a
//! concurrent writer won and the transaction is rolled back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use grievance_core::entities::{Grievance, StatusUpdate};
use grievance_core::lifecycle::Transition;
use grievance_core::query::{
    GrievanceFilter, GrievanceScope, GrievanceStats, Page, PageRequest, SortKey,
};
use grievance_core::traits::{GrievanceRepository, RepoResult};
use grievance_core::{DomainError, Snowflake};

use crate::mappers::GrievanceRow;
use crate::models::{GrievanceModel, GrievanceStatsModel, StatusUpdateModel};

use super::error::{like_pattern, map_db_error};

const GRIEVANCE_COLUMNS: &str = "id, title, description, category, status, photo_url, \
     latitude, longitude, ward_id, created_by, assigned_to, resolution_remarks, priority, \
     version, created_at, updated_at, resolved_at";

const SCOPE_AND_FILTER: &str = "($1::text IS NULL OR created_by = $1) \
     AND ($2::int4 IS NULL OR ward_id = $2) \
     AND ($3::text IS NULL OR status = $3) \
     AND ($4::text IS NULL OR category = $4) \
     AND ($5::text IS NULL OR title ILIKE $5 OR description ILIKE $5 OR id::text LIKE $5)";

fn order_by(sort: SortKey) -> &'static str {
    match sort {
        SortKey::Newest => "created_at DESC, id DESC",
        SortKey::Oldest => "created_at ASC, id ASC",
        SortKey::Priority => {
            "CASE priority WHEN 'high' THEN 0 WHEN 'medium' THEN 1 WHEN 'low' THEN 2 ELSE 3 END, \
             created_at DESC, id DESC"
        }
    }
}

/// `(created_by, ward_id)` bind values, `None` when the scope is empty
fn scope_binds(scope: &GrievanceScope) -> Option<(Option<&str>, Option<i32>)> {
    match scope {
        GrievanceScope::Citizen(id) => Some((Some(id.as_str()), None)),
        GrievanceScope::Ward(ward_id) => Some((None, Some(*ward_id))),
        GrievanceScope::Nothing => None,
    }
}

/// PostgreSQL implementation of GrievanceRepository
#[derive(Clone)]
pub struct PgGrievanceRepository {
    pool: PgPool,
}

impl PgGrievanceRepository {
    /// Create a new PgGrievanceRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_status_update(
        tx: &mut Transaction<'_, Postgres>,
        entry: &StatusUpdate,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO grievance_status_updates
                (id, grievance_id, old_status, new_status, remarks, updated_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(entry.id.into_inner())
        .bind(entry.grievance_id.into_inner())
        .bind(entry.old_status.map(|s| s.as_str()))
        .bind(entry.new_status.as_str())
        .bind(entry.remarks.as_deref())
        .bind(&entry.updated_by)
        .bind(entry.created_at)
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    /// Version-checked UPDATE of the mutable columns; returns rows affected
    async fn update_versioned<'e, E>(
        executor: E,
        grievance: &Grievance,
        expected_version: i64,
    ) -> RepoResult<u64>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let row = GrievanceRow::new(grievance);
        let result = sqlx::query(
            r"
            UPDATE grievances
            SET status = $3, assigned_to = $4, resolution_remarks = $5, priority = $6,
                version = $7, updated_at = $8, resolved_at = $9
            WHERE id = $1 AND version = $2
            ",
        )
        .bind(row.id)
        .bind(expected_version)
        .bind(row.status)
        .bind(row.assigned_to)
        .bind(row.resolution_remarks)
        .bind(row.priority)
        .bind(row.version)
        .bind(grievance.updated_at)
        .bind(grievance.resolved_at)
        .execute(executor)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl GrievanceRepository for PgGrievanceRepository {
    #[instrument(skip(self, created), fields(grievance_id = %created.grievance.id))]
    async fn create(&self, created: &Transition) -> RepoResult<()> {
        let grievance = &created.grievance;
        let row = GrievanceRow::new(grievance);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO grievances (id, title, description, category, status, photo_url,
                latitude, longitude, ward_id, created_by, assigned_to, resolution_remarks,
                priority, version, created_at, updated_at, resolved_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ",
        )
        .bind(row.id)
        .bind(row.title)
        .bind(row.description)
        .bind(row.category)
        .bind(row.status)
        .bind(row.photo_url)
        .bind(row.latitude)
        .bind(row.longitude)
        .bind(row.ward_id)
        .bind(row.created_by)
        .bind(row.assigned_to)
        .bind(row.resolution_remarks)
        .bind(row.priority)
        .bind(row.version)
        .bind(grievance.created_at)
        .bind(grievance.updated_at)
        .bind(grievance.resolved_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        Self::insert_status_update(&mut tx, &created.entry).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Grievance>> {
        let query = format!("SELECT {GRIEVANCE_COLUMNS} FROM grievances WHERE id = $1");
        let result = sqlx::query_as::<_, GrievanceModel>(&query)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Grievance::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        scope: &GrievanceScope,
        filter: &GrievanceFilter,
        page: PageRequest,
    ) -> RepoResult<Page<Grievance>> {
        let Some((created_by, ward_id)) = scope_binds(scope) else {
            return Ok(Page::new(Vec::new(), 0, page));
        };
        let status = filter.status.map(|s| s.as_str());
        let category = filter.category.map(|c| c.as_str());
        let search = filter.search().map(like_pattern);

        let count_query = format!("SELECT COUNT(*) FROM grievances WHERE {SCOPE_AND_FILTER}");
        let total = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(created_by)
            .bind(ward_id)
            .bind(status)
            .bind(category)
            .bind(search.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let page_query = format!(
            "SELECT {GRIEVANCE_COLUMNS} FROM grievances WHERE {SCOPE_AND_FILTER} \
             ORDER BY {order} LIMIT $6 OFFSET $7",
            order = order_by(filter.sort),
        );
        let rows = sqlx::query_as::<_, GrievanceModel>(&page_query)
            .bind(created_by)
            .bind(ward_id)
            .bind(status)
            .bind(category)
            .bind(search.as_deref())
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let items = rows
            .into_iter()
            .map(Grievance::try_from)
            .collect::<RepoResult<Vec<_>>>()?;

        Ok(Page::new(items, total, page))
    }

    #[instrument(skip(self))]
    async fn history(&self, grievance_id: Snowflake) -> RepoResult<Vec<StatusUpdate>> {
        let results = sqlx::query_as::<_, StatusUpdateModel>(
            r"
            SELECT id, grievance_id, old_status, new_status, remarks, updated_by, created_at
            FROM grievance_status_updates
            WHERE grievance_id = $1
            ORDER BY created_at, id
            ",
        )
        .bind(grievance_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(StatusUpdate::try_from).collect()
    }

    #[instrument(skip(self, transition), fields(grievance_id = %transition.grievance.id))]
    async fn apply_transition(
        &self,
        transition: &Transition,
        expected_version: i64,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let affected =
            Self::update_versioned(&mut *tx, &transition.grievance, expected_version).await?;
        if affected == 0 {
            tx.rollback().await.map_err(map_db_error)?;
            debug!(expected_version, "version check failed");
            return Err(DomainError::Conflict(transition.grievance.id));
        }

        Self::insert_status_update(&mut tx, &transition.entry).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, grievance), fields(grievance_id = %grievance.id))]
    async fn save(&self, grievance: &Grievance, expected_version: i64) -> RepoResult<()> {
        let affected = Self::update_versioned(&self.pool, grievance, expected_version).await?;
        if affected == 0 {
            debug!(expected_version, "version check failed");
            return Err(DomainError::Conflict(grievance.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn stats(&self, scope: &GrievanceScope, now: DateTime<Utc>) -> RepoResult<GrievanceStats> {
        let Some((created_by, ward_id)) = scope_binds(scope) else {
            return Ok(GrievanceStats::default());
        };

        let result = sqlx::query_as::<_, GrievanceStatsModel>(
            r"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'open') AS open,
                COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress,
                COUNT(*) FILTER (WHERE status = 'resolved') AS resolved,
                COUNT(*) FILTER (WHERE status = 'rejected') AS rejected,
                COUNT(*) FILTER (WHERE created_at >= $3) AS created_this_week,
                AVG(EXTRACT(EPOCH FROM (resolved_at - created_at)))::float8 AS avg_resolution_seconds
            FROM grievances
            WHERE ($1::text IS NULL OR created_by = $1)
              AND ($2::int4 IS NULL OR ward_id = $2)
            ",
        )
        .bind(created_by)
        .bind(ward_id)
        .bind(GrievanceStats::week_start(now))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(GrievanceStats::from(result))
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> RepoResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
