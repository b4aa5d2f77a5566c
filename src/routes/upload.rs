//! Upload Routes
//!
//! - POST /api/upload - Store a PDF and return its share link
//!
//! The file arrives as a multipart field named `pdf` (or `file`). Its bytes
//! are streamed straight to the blob store; nothing is buffered whole.

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        DefaultBodyLimit, Multipart, State,
    },
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::metadata::{FileId, FileRecord};
use crate::state::AppState;
use crate::storage::BlobWriter;

/// Multipart field names accepted as the upload
const UPLOAD_FIELDS: &[&str] = &["pdf", "file"];

const PDF_MIME: &str = "application/pdf";

/// Allowance for multipart boundaries and part headers on top of the file
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

// ============================================================================
// Response
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub file_id: FileId,
    pub original_name: String,
    pub size: u64,
    pub share_url: String,
}

// ============================================================================
// Router
// ============================================================================

/// Create the upload router
pub fn router(max_upload_size: u64) -> Router<AppState> {
    let body_limit = usize::try_from(max_upload_size + MULTIPART_OVERHEAD).unwrap_or(usize::MAX);

    Router::new()
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(body_limit))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/upload
async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let max_size = state.config().storage.max_upload_size;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_size))?
    {
        let name = field.name().unwrap_or("");
        // An empty filename is what browsers send for an untouched file input
        let Some(file_name) = field
            .file_name()
            .filter(|n| !n.is_empty())
            .map(str::to_string)
        else {
            continue;
        };
        if !UPLOAD_FIELDS.contains(&name) {
            tracing::debug!(field = %name, "Skipping unexpected multipart field");
            continue;
        }

        let content_type = field.content_type().unwrap_or("");
        if !is_pdf(content_type) {
            tracing::warn!(
                file_name = %file_name,
                content_type = %content_type,
                "Rejected non-PDF upload"
            );
            return Err(AppError::InvalidFileType);
        }

        let mut record = FileRecord::new(file_name);
        state.metadata().put(record.clone()).await;

        let size = match store_field(&state, &record, &mut field, max_size).await {
            Ok(size) => size,
            Err(e) => {
                state.metadata().delete(record.id).await;
                return Err(e);
            }
        };

        record.size = size;
        state.metadata().put(record.clone()).await;

        tracing::info!(
            file_id = %record.id,
            original_name = %record.original_name,
            stored_name = %record.stored_name,
            size = size,
            "PDF uploaded"
        );

        return Ok(Json(UploadResponse {
            success: true,
            share_url: share_url(&state, &headers, record.id),
            file_id: record.id,
            original_name: record.original_name,
            size,
        }));
    }

    tracing::warn!("No file field found in multipart upload");
    Err(AppError::NoFileUploaded)
}

// ============================================================================
// Helpers
// ============================================================================

/// Stream a multipart field into a new blob, returning the byte count
async fn store_field(
    state: &AppState,
    record: &FileRecord,
    field: &mut Field<'_>,
    max_size: u64,
) -> Result<u64> {
    let mut writer = state.blobs().create(&record.stored_name).await?;

    match copy_field(&mut writer, field, max_size).await {
        Ok(()) => Ok(writer.commit().await?),
        Err(e) => {
            writer.abort().await;
            Err(e)
        }
    }
}

async fn copy_field(writer: &mut BlobWriter, field: &mut Field<'_>, max_size: u64) -> Result<()> {
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, max_size))?
    {
        if writer.written() + chunk.len() as u64 > max_size {
            tracing::warn!(max_size = max_size, "Upload exceeded size limit");
            return Err(AppError::file_too_large(max_size));
        }
        writer.write_chunk(&chunk).await?;
    }

    Ok(())
}

/// Body-limit rejections surface as multipart errors; report them as the
/// size error clients expect.
fn multipart_error(err: MultipartError, max_size: u64) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::file_too_large(max_size)
    } else {
        AppError::MalformedUpload(err.body_text())
    }
}

/// Compare the media type, ignoring parameters and case
fn is_pdf(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_MIME))
        .unwrap_or(false)
}

/// Build the public link to the share page
fn share_url(state: &AppState, headers: &HeaderMap, id: FileId) -> String {
    let server = &state.config().server;

    let base = match &server.public_base_url {
        Some(base) => base.clone(),
        None => {
            let host = headers
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .unwrap_or_else(|| format!("localhost:{}", server.port));
            let scheme = headers
                .get("x-forwarded-proto")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("http");
            format!("{scheme}://{host}")
        }
    };

    format!("{base}/share/{id}")
}
