use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ErrorResponse;

/// Request-level failures. Every variant maps to exactly one status code and
/// serializes as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Outside allowed area: {0}")]
    OutOfBounds(String),

    #[error("Spoofing suspected: {0}")]
    SpoofingSuspected(String),

    #[error("Request closed: {0}")]
    RequestClosed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code, used in logs
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::OutOfBounds(_) => "OUT_OF_BOUNDS",
            AppError::SpoofingSuspected(_) => "SPOOFING_SUSPECTED",
            AppError::RequestClosed(_) => "REQUEST_CLOSED",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_)
            | AppError::OutOfBounds(_)
            | AppError::SpoofingSuspected(_)
            | AppError::RequestClosed(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = match self {
            AppError::InvalidInput(msg)
            | AppError::OutOfBounds(msg)
            | AppError::SpoofingSuspected(msg)
            | AppError::RequestClosed(msg) => {
                tracing::info!("Submission rejected ({}): {}", code, msg);
                msg
            }
            AppError::Storage(msg) => {
                tracing::error!("{}: {}", code, msg);
                "Failed to save location, please try again".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("{}: {}", code, msg);
                "Internal server error".to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
