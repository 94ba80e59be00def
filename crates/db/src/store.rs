//! [`TrialStore`] implementation over PostgreSQL.

use async_trait::async_trait;
use trials_core::store::{StoreError, StoreResult, TrialStore};
use trials_core::trial::{NormalizedTrial, Trial, TrialStatus};
use trials_core::types::{DbId, Timestamp};

use crate::models::trial::TrialRow;
use crate::repositories::TrialRepo;
use crate::DbPool;

/// PostgreSQL unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Routes [`TrialStore`] calls to [`TrialRepo`].
///
/// Uniqueness of `trial_id` is enforced by the `uq_trials_trial_id`
/// constraint; a violation surfaces as [`StoreError::Conflict`].
#[derive(Debug, Clone)]
pub struct PgTrialStore {
    pool: DbPool,
}

impl PgTrialStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown");
            tracing::debug!(constraint, "Unique constraint violation");
            return StoreError::Conflict(format!(
                "Duplicate value violates unique constraint: {constraint}"
            ));
        }
    }
    StoreError::backend(err)
}

fn to_trial(row: TrialRow) -> StoreResult<Trial> {
    Trial::try_from(row).map_err(StoreError::backend)
}

#[async_trait]
impl TrialStore for PgTrialStore {
    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Trial>> {
        TrialRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .map(to_trial)
            .transpose()
    }

    async fn find_by_trial_id(&self, trial_id: &str) -> StoreResult<Option<Trial>> {
        TrialRepo::find_by_trial_id(&self.pool, trial_id)
            .await
            .map_err(map_sqlx_error)?
            .map(to_trial)
            .transpose()
    }

    async fn list(&self, status: Option<TrialStatus>) -> StoreResult<Vec<Trial>> {
        TrialRepo::list(&self.pool, status)
            .await
            .map_err(map_sqlx_error)?
            .into_iter()
            .map(to_trial)
            .collect()
    }

    async fn insert(&self, trial: &NormalizedTrial) -> StoreResult<Trial> {
        let row = TrialRepo::create(&self.pool, trial)
            .await
            .map_err(map_sqlx_error)?;
        to_trial(row)
    }

    async fn replace(
        &self,
        id: DbId,
        trial: &NormalizedTrial,
        updated_at: Timestamp,
    ) -> StoreResult<Trial> {
        let row = TrialRepo::replace(&self.pool, id, trial, updated_at)
            .await
            .map_err(map_sqlx_error)?
            .ok_or(StoreError::NotFound { id })?;
        to_trial(row)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        TrialRepo::delete(&self.pool, id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn ping(&self) -> StoreResult<()> {
        crate::health_check(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}
