// Application error type and its HTTP mapping

use crate::models::ApiResponse;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Malformed or oversized multipart body; keeps the extractor's status
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Multipart(e) => e.status(),
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the HTTP caller
    pub fn message(&self) -> String {
        match self {
            AppError::InvalidRequest(message) => message.clone(),
            AppError::Multipart(e) => e.body_text(),
            AppError::Io(_) => "Failed to store file".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(ApiResponse::error(self.message()))).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
