//! PDF content routes
//!
//! - GET /api/view/:id - Stream the PDF for display in the browser
//! - GET /api/download/:id - Stream the PDF as an attachment
//!
//! Both return the same bytes and differ only in `Content-Disposition`.
//! Range requests are not supported.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use tokio_util::io::ReaderStream;

use super::find_record;
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Inline,
    Attachment,
}

impl Disposition {
    fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Attachment => "attachment",
        }
    }
}

/// Create the PDF content router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/view/:id", get(view_pdf))
        .route("/download/:id", get(download_pdf))
}

/// GET /api/view/:id
async fn view_pdf(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    serve_pdf(&state, &id, Disposition::Inline).await
}

/// GET /api/download/:id
async fn download_pdf(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    serve_pdf(&state, &id, Disposition::Attachment).await
}

async fn serve_pdf(state: &AppState, id: &str, disposition: Disposition) -> Result<Response> {
    let record = find_record(state, id).await?;

    // A concurrent delete can remove the blob after the record lookup; that
    // surfaces here as a missing blob.
    let (file, len) = state
        .blobs()
        .open(&record.stored_name)
        .await?
        .ok_or_else(|| {
            tracing::warn!(
                file_id = %record.id,
                stored_name = %record.stored_name,
                "Record present but blob missing on disk"
            );
            AppError::BlobMissing
        })?;

    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_LENGTH, len)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(disposition, &record.original_name),
        )
        .body(body)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Build a `Content-Disposition` value carrying the original filename.
///
/// The quoted `filename` is ASCII-only with quotes escaped; names outside
/// ASCII also get an RFC 5987 `filename*`.
fn content_disposition(disposition: Disposition, original_name: &str) -> String {
    let mut fallback = String::with_capacity(original_name.len());
    for c in original_name.chars() {
        match c {
            '"' | '\\' => {
                fallback.push('\\');
                fallback.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => fallback.push(c),
            _ => fallback.push('_'),
        }
    }

    let mut value = format!("{}; filename=\"{}\"", disposition.as_str(), fallback);
    if !original_name.is_ascii() {
        value.push_str("; filename*=UTF-8''");
        value.push_str(&urlencoding::encode(original_name));
    }
    value
}
