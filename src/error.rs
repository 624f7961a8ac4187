use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::models::PanelKey;

/// Failures talking to a generation backend or interpreting its reply.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Request failed: {0}")]
    Http(String),

    #[error("Provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Malformed story document: {0}")]
    Parse(String),

    #[error("Response contained no image payload")]
    MissingImage,
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Http(err.to_string())
    }
}

/// Failures addressing the shared story document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("No story has been generated yet")]
    NoStory,

    #[error("Panel {0} not found")]
    PanelNotFound(PanelKey),

    #[error("Story session was replaced")]
    StaleSession,
}

/// Error type returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type AppResult<T> = Result<T, AppError>;

/// Malformed or mistyped request bodies are reported like any other invalid input.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Generation(GenerationError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Generation(GenerationError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Generation(err) => {
                tracing::error!(error = %err, "Story generation failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "STORY_GENERATION_FAILED",
                    "Failed to generate story structure. Please try again.".to_string(),
                )
            }
            AppError::Store(StoreError::StaleSession) => {
                (StatusCode::CONFLICT, "CONFLICT", self.to_string())
            }
            AppError::Store(err) => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
