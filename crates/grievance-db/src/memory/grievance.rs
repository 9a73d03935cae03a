//! In-memory implementation of GrievanceRepository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, instrument};

use grievance_core::entities::{Grievance, StatusUpdate};
use grievance_core::lifecycle::Transition;
use grievance_core::query::{GrievanceFilter, GrievanceScope, GrievanceStats, Page, PageRequest};
use grievance_core::traits::{GrievanceRepository, RepoResult};
use grievance_core::{DomainError, Snowflake};

#[derive(Debug, Default)]
struct State {
    grievances: HashMap<Snowflake, Grievance>,
    history: HashMap<Snowflake, Vec<StatusUpdate>>,
}

impl State {
    /// Version-checked replace of a stored grievance
    fn replace(&mut self, grievance: &Grievance, expected_version: i64) -> RepoResult<()> {
        let stored = self
            .grievances
            .get_mut(&grievance.id)
            .ok_or(DomainError::GrievanceNotFound(grievance.id))?;
        if stored.version != expected_version {
            debug!(
                grievance_id = %grievance.id,
                expected_version,
                stored_version = stored.version,
                "version check failed"
            );
            return Err(DomainError::Conflict(grievance.id));
        }
        *stored = grievance.clone();
        Ok(())
    }
}

/// Grievances and their history held in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryGrievanceRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryGrievanceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GrievanceRepository for InMemoryGrievanceRepository {
    #[instrument(skip(self, created), fields(grievance_id = %created.grievance.id))]
    async fn create(&self, created: &Transition) -> RepoResult<()> {
        let id = created.grievance.id;
        let mut state = self.state.write();
        if state.grievances.contains_key(&id) {
            return Err(DomainError::DatabaseError(format!(
                "grievance {id} already exists"
            )));
        }
        state.grievances.insert(id, created.grievance.clone());
        state.history.insert(id, vec![created.entry.clone()]);
        Ok(())
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Grievance>> {
        Ok(self.state.read().grievances.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        scope: &GrievanceScope,
        filter: &GrievanceFilter,
        page: PageRequest,
    ) -> RepoResult<Page<Grievance>> {
        let state = self.state.read();
        let mut matching: Vec<&Grievance> = state
            .grievances
            .values()
            .filter(|g| scope.contains(g) && filter.matches(g))
            .collect();
        matching.sort_by(|a, b| filter.sort.compare(a, b));

        let total = matching.len() as i64;
        let items = page.slice(&matching).into_iter().cloned().collect();
        Ok(Page::new(items, total, page))
    }

    async fn history(&self, grievance_id: Snowflake) -> RepoResult<Vec<StatusUpdate>> {
        let mut entries = self
            .state
            .read()
            .history
            .get(&grievance_id)
            .cloned()
            .unwrap_or_default();
        entries.sort_by_key(|entry| (entry.created_at, entry.id));
        Ok(entries)
    }

    #[instrument(skip(self, transition), fields(grievance_id = %transition.grievance.id))]
    async fn apply_transition(
        &self,
        transition: &Transition,
        expected_version: i64,
    ) -> RepoResult<()> {
        let mut state = self.state.write();
        state.replace(&transition.grievance, expected_version)?;
        state
            .history
            .entry(transition.grievance.id)
            .or_default()
            .push(transition.entry.clone());
        Ok(())
    }

    #[instrument(skip(self, grievance), fields(grievance_id = %grievance.id))]
    async fn save(&self, grievance: &Grievance, expected_version: i64) -> RepoResult<()> {
        self.state.write().replace(grievance, expected_version)
    }

    async fn stats(&self, scope: &GrievanceScope, now: DateTime<Utc>) -> RepoResult<GrievanceStats> {
        let state = self.state.read();
        Ok(GrievanceStats::from_grievances(
            state.grievances.values().filter(|g| scope.contains(g)),
            now,
        ))
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}
