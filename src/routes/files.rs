//! File metadata routes
//!
//! - GET /api/files - List all records
//! - GET /api/file/:id - Get one record
//! - DELETE /api/file/:id - Delete a record and its blob

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::find_record;
use crate::error::Result;
use crate::metadata::FileRecord;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Create the files router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/files", get(list_files))
        .route("/file/:id", get(get_file).delete(delete_file))
}

/// GET /api/files
async fn list_files(State(state): State<AppState>) -> Json<Vec<FileRecord>> {
    Json(state.metadata().list().await)
}

/// GET /api/file/:id
async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FileRecord>> {
    find_record(&state, &id).await.map(Json)
}

/// DELETE /api/file/:id
///
/// The blob goes first. If that fails the record stays, so the blob is
/// never orphaned.
async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let record = find_record(&state, &id).await?;

    let removed = state.blobs().delete(&record.stored_name).await?;
    if !removed {
        tracing::warn!(
            file_id = %record.id,
            stored_name = %record.stored_name,
            "Blob already missing, removing record only"
        );
    }

    state.metadata().delete(record.id).await;

    tracing::info!(
        file_id = %record.id,
        original_name = %record.original_name,
        "File deleted"
    );

    Ok(Json(DeleteResponse {
        success: true,
        message: "File deleted successfully",
    }))
}
