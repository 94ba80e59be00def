#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use trials_core::ingest::IngestPipeline;
use trials_core::memory::MemoryTrialStore;
use trials_core::store::TrialStore;

use trials_api::config::ServerConfig;
use trials_api::router::build_app_router;
use trials_api::state::AppState;

pub const BOUNDARY: &str = "trial-upload-boundary";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and a 1 KiB upload limit so oversize
/// uploads are cheap to construct.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024,
    }
}

/// Build the full application router over the given store.
pub fn build_test_app_with(store: Arc<dyn TrialStore>) -> Router {
    let config = test_config();
    let state = AppState {
        pipeline: Arc::new(IngestPipeline::new(store)),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Build the full application router over a fresh in-memory store.
pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(MemoryTrialStore::new()))
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a DELETE request.
pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Build a `multipart/form-data` body with one file part.
pub fn multipart_body(field: &str, file_name: &str, content: &str) -> String {
    format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/json\r\n\
         \r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    )
}

/// POST a file to `/api/v1/trials/upload` as multipart field `file`.
pub async fn upload(app: Router, file_name: &str, content: &str) -> Response<Body> {
    upload_field(app, "file", file_name, content).await
}

/// POST a file under an arbitrary multipart field name.
pub async fn upload_field(
    app: Router,
    field: &str,
    file_name: &str,
    content: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/trials/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field, file_name, content)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
