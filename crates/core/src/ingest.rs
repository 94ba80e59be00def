//! Ingest pipeline: validate, parse, normalize, then upsert by natural key.
//!
//! Validation and parsing are two independent passes. The schema check runs
//! on the raw text first; only a document that passes it is parsed into a
//! [`TrialDocument`]. A parse failure after a successful validation means the
//! schema and the parser disagree and is reported as [`CoreError::Internal`].
//!
//! The lookup-then-write sequence holds no lock. Two first-sight submissions
//! racing on one `trial_id` are settled by the store's uniqueness constraint;
//! the loser receives [`StoreError::Conflict`](crate::store::StoreError).

use std::sync::Arc;

use chrono::Utc;

use crate::error::CoreError;
use crate::normalize::normalize;
use crate::schema;
use crate::store::TrialStore;
use crate::trial::{Trial, TrialDocument, TrialStatus};
use crate::types::DbId;

/// Entry point used by the transport layer.
#[derive(Clone)]
pub struct IngestPipeline {
    store: Arc<dyn TrialStore>,
}

impl IngestPipeline {
    pub fn new(store: Arc<dyn TrialStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn TrialStore> {
        &self.store
    }

    /// Whether `raw` satisfies the trial schema.
    pub fn validate(&self, raw: &str) -> bool {
        schema::is_valid_document(raw)
    }

    /// Validate, normalize and upsert one trial document.
    ///
    /// Issues exactly one store write: a replace when a trial with the same
    /// `trial_id` exists, otherwise an insert. Nothing is written when
    /// validation fails.
    pub async fn process_and_save(&self, raw: &str) -> Result<Trial, CoreError> {
        if !self.validate(raw) {
            let reasons = schema::violations(raw);
            tracing::debug!(?reasons, "Rejected trial document");
            return Err(CoreError::Validation(format!(
                "Invalid trial document: {}",
                reasons.join("; ")
            )));
        }

        let document = TrialDocument::parse(raw).map_err(|e| {
            CoreError::Internal(format!("validated trial document failed to parse: {e}"))
        })?;
        let trial = normalize(document)?;

        match self.store.find_by_trial_id(&trial.trial_id).await? {
            Some(existing) => {
                let saved = self
                    .store
                    .replace(existing.id, &trial, Utc::now())
                    .await?;
                tracing::info!(id = saved.id, trial_id = %saved.trial_id, "Trial updated");
                Ok(saved)
            }
            None => {
                let saved = self.store.insert(&trial).await?;
                tracing::info!(id = saved.id, trial_id = %saved.trial_id, "Trial created");
                Ok(saved)
            }
        }
    }

    pub async fn get_by_id(&self, id: DbId) -> Result<Option<Trial>, CoreError> {
        Ok(self.store.find_by_id(id).await?)
    }

    pub async fn get_by_trial_id(&self, trial_id: &str) -> Result<Option<Trial>, CoreError> {
        Ok(self.store.find_by_trial_id(trial_id).await?)
    }

    /// All trials, or only those with `status` when given.
    pub async fn list_by_status(
        &self,
        status: Option<TrialStatus>,
    ) -> Result<Vec<Trial>, CoreError> {
        Ok(self.store.list(status).await?)
    }

    /// Administrative removal. Returns `false` if the trial does not exist.
    pub async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            tracing::info!(id, "Trial deleted");
        }
        Ok(deleted)
    }
}
