//! In-memory [`TrialStore`] for tests and database-less development runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::store::{StoreError, StoreResult, TrialStore};
use crate::trial::{NormalizedTrial, Trial, TrialStatus};
use crate::types::{DbId, Timestamp};

#[derive(Debug, Default)]
struct Rows {
    last_id: DbId,
    trials: BTreeMap<DbId, Trial>,
}

impl Rows {
    fn trial_id_taken(&self, trial_id: &str, except: Option<DbId>) -> bool {
        self.trials
            .values()
            .any(|t| t.trial_id == trial_id && Some(t.id) != except)
    }
}

/// A [`TrialStore`] backed by a map guarded by a `RwLock`.
///
/// Ids start at 1 and are never reused. `trial_id` uniqueness is enforced
/// under the write lock, mirroring the `uq_trials_trial_id` constraint.
#[derive(Debug, Default)]
pub struct MemoryTrialStore {
    rows: RwLock<Rows>,
}

impl MemoryTrialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored trials.
    pub fn len(&self) -> StoreResult<usize> {
        let rows = self.rows.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(rows.trials.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl TrialStore for MemoryTrialStore {
    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Trial>> {
        let rows = self.rows.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(rows.trials.get(&id).cloned())
    }

    async fn find_by_trial_id(&self, trial_id: &str) -> StoreResult<Option<Trial>> {
        let rows = self.rows.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(rows
            .trials
            .values()
            .find(|t| t.trial_id == trial_id)
            .cloned())
    }

    async fn list(&self, status: Option<TrialStatus>) -> StoreResult<Vec<Trial>> {
        let rows = self.rows.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(rows
            .trials
            .values()
            .filter(|t| status.is_none_or(|s| t.status == s))
            .cloned()
            .collect())
    }

    async fn insert(&self, trial: &NormalizedTrial) -> StoreResult<Trial> {
        let mut rows = self.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        if rows.trial_id_taken(&trial.trial_id, None) {
            return Err(StoreError::Conflict(format!(
                "trial_id {} already exists",
                trial.trial_id
            )));
        }
        rows.last_id += 1;
        let stored = Trial::from_normalized(rows.last_id, trial.clone(), Utc::now(), None);
        rows.trials.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn replace(
        &self,
        id: DbId,
        trial: &NormalizedTrial,
        updated_at: Timestamp,
    ) -> StoreResult<Trial> {
        let mut rows = self.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        if rows.trial_id_taken(&trial.trial_id, Some(id)) {
            return Err(StoreError::Conflict(format!(
                "trial_id {} already exists",
                trial.trial_id
            )));
        }
        let created_at = rows
            .trials
            .get(&id)
            .map(|existing| existing.created_at)
            .ok_or(StoreError::NotFound { id })?;
        let stored = Trial::from_normalized(id, trial.clone(), created_at, Some(updated_at));
        rows.trials.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut rows = self.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(rows.trials.remove(&id).is_some())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.rows.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(())
    }
}
