//! Handlers for the `/trials` resource.
//!
//! Upload accepts a single `.json` file as multipart field `file` and runs it
//! through the ingest pipeline. Reads return `{ "data": ... }` envelopes.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use trials_core::error::CoreError;
use trials_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::query::TrialListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the trial document.
pub const UPLOAD_FIELD: &str = "file";

fn not_found(id: impl ToString) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Trial",
        id: id.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// Reject uploads that are empty, too large, or not named `*.json`.
pub fn check_upload(file_name: &str, len: usize, max_bytes: usize) -> AppResult<()> {
    if len == 0 {
        return Err(AppError::BadRequest("No file uploaded".to_string()));
    }
    if len > max_bytes {
        return Err(AppError::BadRequest(format!(
            "File size exceeds the limit of {max_bytes} bytes"
        )));
    }
    if !file_name.to_ascii_lowercase().ends_with(".json") {
        return Err(AppError::BadRequest(
            "Only .json files are allowed".to_string(),
        ));
    }
    Ok(())
}

/// Pull the `file` field out of the multipart body as UTF-8 text.
async fn read_upload(multipart: &mut Multipart, max_bytes: usize) -> AppResult<String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        check_upload(&file_name, data.len(), max_bytes)?;

        return decode_upload(&data);
    }

    Err(AppError::BadRequest("No file uploaded".to_string()))
}

/// UTF-8 byte-order mark written by some editors.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode uploaded bytes as UTF-8 text, dropping a leading byte-order mark.
pub fn decode_upload(data: &[u8]) -> AppResult<String> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    String::from_utf8(data.to_vec()).map_err(|_| {
        AppError::Core(CoreError::Validation(
            "Uploaded file is not valid UTF-8".to_string(),
        ))
    })
}

/// POST /api/v1/trials/upload
///
/// Validate and upsert one trial document. Responds 201 with the stored
/// record and a `Location` header pointing at it.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let raw = read_upload(&mut multipart, state.config.max_upload_bytes).await?;
    let trial = state.pipeline.process_and_save(&raw).await?;

    let location = format!("/api/v1/trials/{}", trial.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(DataResponse { data: trial }),
    ))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/trials/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let trial = state
        .pipeline
        .get_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: trial }))
}

/// GET /api/v1/trials/by-trial-id/{trial_id}
pub async fn get_by_trial_id(
    State(state): State<AppState>,
    Path(trial_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let trial = state
        .pipeline
        .get_by_trial_id(&trial_id)
        .await?
        .ok_or_else(|| not_found(&trial_id))?;
    Ok(Json(DataResponse { data: trial }))
}

/// GET /api/v1/trials?status=Ongoing
///
/// List trials, optionally filtered by status.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TrialListParams>,
) -> AppResult<impl IntoResponse> {
    let trials = state.pipeline.list_by_status(params.status()?).await?;
    Ok(Json(DataResponse { data: trials }))
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// DELETE /api/v1/trials/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if state.pipeline.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
