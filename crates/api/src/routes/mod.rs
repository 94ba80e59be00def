pub mod health;
pub mod trial;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /trials                                          list (?status=)
/// /trials/upload                                   multipart upload (POST)
/// /trials/{id}                                     get, delete
/// /trials/by-trial-id/{trial_id}                   get by natural key
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/trials", trial::router())
}
