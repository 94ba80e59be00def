use std::sync::Arc;

use trials_core::ingest::IngestPipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Validate/normalize/upsert pipeline over the configured trial store.
    pub pipeline: Arc<IngestPipeline>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
