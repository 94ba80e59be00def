//! Route definitions for trials.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::trial;
use crate::state::AppState;

/// Routes mounted at `/trials`.
///
/// ```text
/// GET    /                          -> list
/// POST   /upload                    -> upload
/// GET    /{id}                      -> get_by_id
/// DELETE /{id}                      -> delete
/// GET    /by-trial-id/{trial_id}    -> get_by_trial_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trial::list))
        .route("/upload", post(trial::upload))
        .route("/{id}", get(trial::get_by_id).delete(trial::delete))
        .route("/by-trial-id/{trial_id}", get(trial::get_by_trial_id))
}
