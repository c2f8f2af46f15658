use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Service not configured: {0}")]
    NotConfigured(String),

    #[error("Content index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Model output error: {0}")]
    ModelOutput(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NotConfigured(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "NOT_CONFIGURED",
                msg.clone(),
            ),
            AppError::IndexUnavailable(msg) => {
                tracing::error!("Content index unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "INDEX_UNAVAILABLE",
                    "The content index could not be loaded".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "LLM_UNAVAILABLE",
                    "The AI service is temporarily unavailable".to_string(),
                )
            }
            AppError::ModelOutput(msg) => {
                tracing::error!("Model output error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MODEL_OUTPUT_ERROR",
                    "The AI service returned an unusable response".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
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
