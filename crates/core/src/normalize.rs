//! Business rules that fill the derived fields of a trial.
//!
//! - An `Ongoing` trial without an end date ends one calendar month after it
//!   starts. Month arithmetic clamps to the last day of the target month, so
//!   2024-01-31 becomes 2024-02-29.
//! - Whenever an end date is present, `duration_days` is the signed whole-day
//!   difference `end_date - start_date`. An end date before the start date
//!   yields a negative duration; it is not rejected.

use chrono::{Months, NaiveDate};

use crate::error::CoreError;
use crate::trial::{NormalizedTrial, TrialDocument, TrialStatus};

/// Apply the business rules to a parsed document.
pub fn normalize(document: TrialDocument) -> Result<NormalizedTrial, CoreError> {
    let end_date = match document.end_date {
        Some(end) => Some(end),
        None if document.status == TrialStatus::Ongoing => {
            Some(default_end_date(document.start_date)?)
        }
        None => None,
    };

    let duration_days = end_date
        .map(|end| duration_days(document.start_date, end))
        .transpose()?;

    Ok(NormalizedTrial {
        trial_id: document.trial_id,
        title: document.title,
        start_date: document.start_date,
        end_date,
        participants: document.participants,
        status: document.status,
        duration_days,
    })
}

/// Default end date for an ongoing trial: start date plus one calendar month.
pub fn default_end_date(start: NaiveDate) -> Result<NaiveDate, CoreError> {
    start
        .checked_add_months(Months::new(1))
        .ok_or_else(|| CoreError::Internal(format!("end date overflow for start date {start}")))
}

/// Signed number of whole days from `start` to `end`.
pub fn duration_days(start: NaiveDate, end: NaiveDate) -> Result<i32, CoreError> {
    let days = end.signed_duration_since(start).num_days();
    i32::try_from(days)
        .map_err(|_| CoreError::Internal(format!("duration of {days} days is out of range")))
}
