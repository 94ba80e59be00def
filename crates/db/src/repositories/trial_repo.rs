//! Repository for the `trials` table.

use sqlx::PgPool;
use trials_core::trial::{NormalizedTrial, TrialStatus};
use trials_core::types::{DbId, Timestamp};

use crate::models::trial::TrialRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, trial_id, title, start_date, end_date, participants, \
                       status_id, duration_days, created_at, updated_at";

/// Provides CRUD operations for trials.
pub struct TrialRepo;

impl TrialRepo {
    /// Insert a new trial, returning the created row.
    ///
    /// `created_at` comes from the column default.
    pub async fn create(pool: &PgPool, input: &NormalizedTrial) -> Result<TrialRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO trials \
                (trial_id, title, start_date, end_date, participants, status_id, duration_days) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrialRow>(&query)
            .bind(&input.trial_id)
            .bind(&input.title)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.participants)
            .bind(input.status.id())
            .bind(input.duration_days)
            .fetch_one(pool)
            .await
    }

    /// Find a trial by its surrogate ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TrialRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trials WHERE id = $1");
        sqlx::query_as::<_, TrialRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a trial by its natural key.
    pub async fn find_by_trial_id(
        pool: &PgPool,
        trial_id: &str,
    ) -> Result<Option<TrialRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trials WHERE trial_id = $1");
        sqlx::query_as::<_, TrialRow>(&query)
            .bind(trial_id)
            .fetch_optional(pool)
            .await
    }

    /// List trials, optionally filtered by status. Ordered by id.
    pub async fn list(
        pool: &PgPool,
        status: Option<TrialStatus>,
    ) -> Result<Vec<TrialRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trials \
             WHERE ($1::SMALLINT IS NULL OR status_id = $1) \
             ORDER BY id"
        );
        sqlx::query_as::<_, TrialRow>(&query)
            .bind(status.map(TrialStatus::id))
            .fetch_all(pool)
            .await
    }

    /// Overwrite every mutable column of a trial. `id` and `created_at` are
    /// left untouched.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        input: &NormalizedTrial,
        updated_at: Timestamp,
    ) -> Result<Option<TrialRow>, sqlx::Error> {
        let query = format!(
            "UPDATE trials SET \
                trial_id = $2, \
                title = $3, \
                start_date = $4, \
                end_date = $5, \
                participants = $6, \
                status_id = $7, \
                duration_days = $8, \
                updated_at = $9 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrialRow>(&query)
            .bind(id)
            .bind(&input.trial_id)
            .bind(&input.title)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.participants)
            .bind(input.status.id())
            .bind(input.duration_days)
            .bind(updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete a trial. Returns `false` if it did not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM trials WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
