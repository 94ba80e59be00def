//! Trial domain types: the incoming document, the normalized record and the
//! persisted record.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::types::{DbId, StatusId, Timestamp};

// ── Status ───────────────────────────────────────────────────────────

/// Trial lifecycle status.
///
/// The serde representation is the document literal (`"Not Started"`,
/// `"Ongoing"`, `"Completed"`) and matches the schema enum one-to-one.
/// Discriminants match the seed order of the `trial_statuses` table.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrialStatus {
    #[serde(rename = "Not Started")]
    NotStarted = 1,
    Ongoing = 2,
    Completed = 3,
}

impl TrialStatus {
    pub const ALL: [TrialStatus; 3] = [Self::NotStarted, Self::Ongoing, Self::Completed];

    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    pub fn from_id(id: StatusId) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.id() == id)
    }

    /// The literal used in trial documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::Ongoing => "Ongoing",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TrialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status filter string names no known status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown trial status: {0}")]
pub struct UnknownStatus(pub String);

/// Lenient parsing for query strings: accepts the document literal and the
/// variant name (`NotStarted`). Document parsing goes through serde and
/// accepts the document literal only.
impl FromStr for TrialStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Not Started" | "NotStarted" => Ok(Self::NotStarted),
            "Ongoing" => Ok(Self::Ongoing),
            "Completed" => Ok(Self::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

// ── Incoming document ────────────────────────────────────────────────

/// A trial document as submitted by the caller.
///
/// Field names are matched case-insensitively: keys are folded to lowercase
/// before deserialization. Keys outside the recognized set are ignored here;
/// rejecting them is the schema validator's job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrialDocument {
    #[serde(rename = "trialid")]
    pub trial_id: String,
    pub title: String,
    #[serde(rename = "startdate")]
    pub start_date: NaiveDate,
    #[serde(rename = "enddate", default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_participants")]
    pub participants: Option<i64>,
    pub status: TrialStatus,
}

impl TrialDocument {
    /// Parse raw JSON text into a document.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        serde_json::from_value(fold_keys(value))
    }
}

fn fold_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, v)| (key.to_lowercase(), v))
                .collect(),
        ),
        other => other,
    }
}

/// The schema's `integer` type admits integral floats such as `5.0`, so the
/// parser must accept them too.
fn deserialize_participants<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Option::<Number>::deserialize(deserializer)?;
    number
        .map(|n| {
            integral_value(&n)
                .ok_or_else(|| D::Error::custom(format!("participants is not an integer: {n}")))
        })
        .transpose()
}

fn integral_value(n: &Number) -> Option<i64> {
    if let Some(v) = n.as_i64() {
        return Some(v);
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

// ── Normalized record ────────────────────────────────────────────────

/// A trial with derived fields filled in, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTrial {
    pub trial_id: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub participants: Option<i64>,
    pub status: TrialStatus,
    pub duration_days: Option<i32>,
}

// ── Persisted record ─────────────────────────────────────────────────

/// A stored trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    pub id: DbId,
    pub trial_id: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub participants: Option<i64>,
    pub status: TrialStatus,
    pub duration_days: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

impl Trial {
    /// Assemble a stored record from its storage-owned parts.
    pub fn from_normalized(
        id: DbId,
        trial: NormalizedTrial,
        created_at: Timestamp,
        updated_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            trial_id: trial.trial_id,
            title: trial.title,
            start_date: trial.start_date,
            end_date: trial.end_date,
            participants: trial.participants,
            status: trial.status,
            duration_days: trial.duration_days,
            created_at,
            updated_at,
        }
    }
}
