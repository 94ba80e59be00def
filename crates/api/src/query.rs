//! Query parameter types for API handlers.

use serde::Deserialize;
use trials_core::trial::TrialStatus;

use crate::error::{AppError, AppResult};

/// Query parameters for `GET /trials` (`?status=`).
#[derive(Debug, Deserialize)]
pub struct TrialListParams {
    pub status: Option<String>,
}

impl TrialListParams {
    /// Parse the optional status filter. An empty value means no filter.
    pub fn status(&self) -> AppResult<Option<TrialStatus>> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<TrialStatus>()
                .map(Some)
                .map_err(|e| AppError::BadRequest(e.to_string())),
        }
    }
}
