use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Structured error types for HTTP status code mapping
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Catch-all for unexpected errors - logs full context internally
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NoFileReceived => AppError::BadRequest(err.to_string()),
            StoreError::NotFound => AppError::NotFound(err.to_string()),
            StoreError::InvalidPath(ref reason) => {
                tracing::warn!(%reason, "Rejected path segment");
                AppError::BadRequest(err.to_string())
            }
            StoreError::Storage(source) => {
                AppError::Internal(anyhow::Error::new(source).context("Upload storage failure"))
            }
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        // body limit hit while streaming the field
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge(err.body_text());
        }
        AppError::BadRequest(format!("Invalid multipart data: {}", err.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::Internal(ref err) => {
                tracing::error!(error = ?err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = AxumJson(json!({
            "ok": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}
