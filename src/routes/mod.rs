//! Route modules for PDF Share Server

pub mod files;
pub mod health;
pub mod pdf;
pub mod share;
pub mod upload;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::{AppError, Result};
use crate::metadata::{FileId, FileRecord};
use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let storage = &state.config().storage;

    let api = Router::new()
        .merge(upload::router(storage.max_upload_size))
        .merge(files::router())
        .merge(pdf::router());

    // In-progress writes live under a dot directory next to the blobs
    let uploads = Router::new()
        .fallback_service(ServeDir::new(&storage.upload_dir))
        .layer(middleware::from_fn(hide_dot_paths));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .nest("/share", share::router())
        .nest("/uploads", uploads)
        .fallback_service(ServeDir::new(&storage.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// 404 any request whose path has a segment starting with `.`, checked
/// after percent-decoding since `ServeDir` decodes too
async fn hide_dot_paths(request: Request, next: Next) -> Response {
    let hidden = request.uri().path().split('/').any(|segment| {
        urlencoding::decode(segment).map_or(true, |decoded| decoded.starts_with('.'))
    });

    if hidden {
        return StatusCode::NOT_FOUND.into_response();
    }

    next.run(request).await
}

/// Resolve a path segment to a stored record. Malformed ids are treated as
/// unknown.
pub(crate) async fn find_record(state: &AppState, raw_id: &str) -> Result<FileRecord> {
    let id: FileId = raw_id.parse().map_err(|_| AppError::NotFound)?;
    state.metadata().get(id).await.ok_or(AppError::NotFound)
}
