/// Surrogate keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Status ID type matching SMALLINT/SMALLSERIAL lookup tables.
pub type StatusId = i16;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
