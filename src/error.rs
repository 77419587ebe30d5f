use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Spatial engine error: {0}")]
    Engine(#[from] sqlx::Error),

    #[error("Spatial engine query timed out after {0} ms")]
    EngineTimeout(u64),

    #[error("Malformed spatial engine data: {0}")]
    MalformedEngineData(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// Responses are plain text; only successful routes are JSON.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Engine(ref e) => {
                tracing::error!("Spatial engine error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Spatial engine error".to_string(),
                )
            }
            AppError::EngineTimeout(ms) => {
                tracing::error!(timeout_ms = ms, "Spatial engine query timed out");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Spatial engine timed out".to_string(),
                )
            }
            AppError::MalformedEngineData(ref e) => {
                tracing::error!("Malformed spatial engine data: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Spatial engine error".to_string(),
                )
            }
            AppError::InvalidRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => {
                tracing::info!("Not found: {}", message);
                (StatusCode::NOT_FOUND, message)
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
