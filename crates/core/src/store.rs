//! The storage collaborator the ingest pipeline writes through.

use async_trait::async_trait;

use crate::trial::{NormalizedTrial, Trial, TrialStatus};
use crate::types::{DbId, Timestamp};

/// Errors raised by a [`TrialStore`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write collided with an existing `trial_id`.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Trial with id {id} not found")]
    NotFound { id: DbId },

    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("Storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent storage for trials.
///
/// Implementations must enforce uniqueness of `trial_id`: an insert that
/// collides with an existing record fails with [`StoreError::Conflict`].
#[async_trait]
pub trait TrialStore: Send + Sync {
    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Trial>>;

    async fn find_by_trial_id(&self, trial_id: &str) -> StoreResult<Option<Trial>>;

    /// All trials, optionally filtered by status. Order is store-defined.
    async fn list(&self, status: Option<TrialStatus>) -> StoreResult<Vec<Trial>>;

    /// Persist a new trial. The store assigns `id` and `created_at`.
    async fn insert(&self, trial: &NormalizedTrial) -> StoreResult<Trial>;

    /// Replace every mutable field of trial `id`.
    ///
    /// `id` and `created_at` are preserved; `updated_at` is set.
    async fn replace(
        &self,
        id: DbId,
        trial: &NormalizedTrial,
        updated_at: Timestamp,
    ) -> StoreResult<Trial>;

    /// Remove trial `id`. Returns `false` if no such trial exists.
    async fn delete(&self, id: DbId) -> StoreResult<bool>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;
}
