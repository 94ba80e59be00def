//! Trial row model.

use chrono::NaiveDate;
use sqlx::FromRow;
use trials_core::trial::{Trial, TrialStatus};
use trials_core::types::{DbId, StatusId, Timestamp};

/// A row from the `trials` table.
#[derive(Debug, Clone, FromRow)]
pub struct TrialRow {
    pub id: DbId,
    pub trial_id: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub participants: Option<i64>,
    pub status_id: StatusId,
    pub duration_days: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

/// The row references a `trial_statuses` id the code does not know.
#[derive(Debug, thiserror::Error)]
#[error("trial {id} has unknown status_id {status_id}")]
pub struct UnknownStatusId {
    pub id: DbId,
    pub status_id: StatusId,
}

impl TryFrom<TrialRow> for Trial {
    type Error = UnknownStatusId;

    fn try_from(row: TrialRow) -> Result<Self, Self::Error> {
        let status = TrialStatus::from_id(row.status_id).ok_or(UnknownStatusId {
            id: row.id,
            status_id: row.status_id,
        })?;
        Ok(Trial {
            id: row.id,
            trial_id: row.trial_id,
            title: row.title,
            start_date: row.start_date,
            end_date: row.end_date,
            participants: row.participants,
            status,
            duration_days: row.duration_days,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
