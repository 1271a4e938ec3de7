use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::engine::embedding::EmbeddingError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The engine was handed input it cannot score meaningfully (e.g. a blank JD).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Similarity could not be computed for the batch. Never paired with partial results.
    #[error("Scoring unavailable: {0}")]
    ScoringUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::ScoringUnavailable(_) => "SCORING_UNAVAILABLE",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<EmbeddingError> for AppError {
    fn from(e: EmbeddingError) -> Self {
        AppError::ScoringUnavailable(format!("embedding failed: {e}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::Validation(msg) | AppError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::ScoringUnavailable(msg) => {
                tracing::error!("Scoring unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Similarity scoring is currently unavailable".to_string(),
                )
            }
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The scoring configuration is invalid".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
