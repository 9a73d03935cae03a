//! In-memory implementation of WardRepository

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use grievance_core::entities::Ward;
use grievance_core::traits::{RepoResult, WardRepository};

/// Failure loading the ward seed file
#[derive(Debug, thiserror::Error)]
pub enum WardSeedError {
    #[error("failed to read ward file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid ward file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("duplicate ward id {0}")]
    DuplicateId(i32),
}

/// Read-only ward reference data
#[derive(Debug, Clone, Default)]
pub struct InMemoryWardRepository {
    wards: Arc<Vec<Ward>>,
}

impl InMemoryWardRepository {
    /// Wards are kept ordered by id
    ///
    /// # Errors
    /// Returns `DuplicateId` if two wards share an id
    pub fn new(mut wards: Vec<Ward>) -> Result<Self, WardSeedError> {
        wards.sort_by_key(|ward| ward.id);
        if let Some(pair) = wards.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(WardSeedError::DuplicateId(pair[0].id));
        }
        Ok(Self {
            wards: Arc::new(wards),
        })
    }

    /// Load a JSON array of wards
    ///
    /// # Errors
    /// Returns an error if the file is unreadable, malformed, or repeats an id
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, WardSeedError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| WardSeedError::Io {
            path: display.clone(),
            source,
        })?;
        let wards: Vec<Ward> = serde_json::from_str(&raw).map_err(|source| WardSeedError::Parse {
            path: display,
            source,
        })?;
        Self::new(wards)
    }

    pub fn len(&self) -> usize {
        self.wards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wards.is_empty()
    }
}

#[async_trait]
impl WardRepository for InMemoryWardRepository {
    async fn list(&self) -> RepoResult<Vec<Ward>> {
        Ok(self.wards.as_ref().clone())
    }

    async fn find_by_id(&self, id: i32) -> RepoResult<Option<Ward>> {
        Ok(self
            .wards
            .binary_search_by_key(&id, |ward| ward.id)
            .ok()
            .map(|index| self.wards[index].clone()))
    }
}
