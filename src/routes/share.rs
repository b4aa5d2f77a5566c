//! Share page route
//!
//! - GET /share/:id - Static viewer page for a known file
//!
//! The page itself is plain HTML from the static directory. It reads the id
//! from its own URL and calls the metadata and view endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use super::find_record;
use crate::error::{AppError, Result};
use crate::state::AppState;

const SHARE_PAGE: &str = "share.html";

/// Create the share router
pub fn router() -> Router<AppState> {
    Router::new().route("/:id", get(share_page))
}

/// GET /share/:id
async fn share_page(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    if find_record(&state, &id).await.is_err() {
        return Ok((StatusCode::NOT_FOUND, "File not found").into_response());
    }

    let page_path = state.config().storage.static_dir.join(SHARE_PAGE);
    let page = tokio::fs::read_to_string(&page_path).await.map_err(|e| {
        AppError::Internal(format!(
            "Failed to read share page {}: {}",
            page_path.display(),
            e
        ))
    })?;

    Ok(Html(page).into_response())
}
