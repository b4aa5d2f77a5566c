//! HTTP error handling
//!
//! Every handler error maps to a status code and a JSON `{"error": ...}`
//! body. There are no error codes beyond the HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::BlobError;

/// Result alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No file uploaded")]
    NoFileUploaded,

    #[error("Only PDF files are allowed")]
    InvalidFileType,

    #[error("File too large. Maximum size is {limit}")]
    FileTooLarge { limit: String },

    #[error("Failed to read upload: {0}")]
    MalformedUpload(String),

    #[error("File not found")]
    NotFound,

    /// The record exists but its blob is gone
    #[error("File not found on disk")]
    BlobMissing,

    #[error("{0}")]
    Storage(#[from] BlobError),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn file_too_large(max_bytes: u64) -> Self {
        const MIB: u64 = 1024 * 1024;

        let limit = if max_bytes >= MIB && max_bytes % MIB == 0 {
            format!("{}MB", max_bytes / MIB)
        } else {
            format!("{max_bytes} bytes")
        };

        Self::FileTooLarge { limit }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoFileUploaded
            | Self::InvalidFileType
            | Self::FileTooLarge { .. }
            | Self::MalformedUpload(_) => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::BlobMissing => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
