pub mod codes;
pub mod fallback;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;
pub use fallback::{FailureDetail, expose_failure_detail};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use utoipa::ToSchema;

/// Envelope returned for every handled error.
///
/// ```json
/// {
///   "code": 1001,
///   "error": "VALIDATION_ERROR",
///   "message": "Body validation failed",
///   "details": [{ "field": "name", "message": "Invalid value" }]
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable identifier
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details,
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("UUID error: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Field-level validation failures, one detail entry per field
    #[error("Validation failed: {details}")]
    Validation { details: Value },

    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(String),

    /// Store failure whose cause is reported back to the client
    #[error("Database error: {0}")]
    Database(String),

    /// Not handled by the caller. Rendered by the fallback responder as a
    /// minimal body; see [`fallback`].
    #[error("{message}: {detail}")]
    Unhandled {
        status: StatusCode,
        message: String,
        detail: String,
    },
}

impl AppError {
    /// 500 for a failure that the handler does not shape itself
    pub fn unhandled(detail: impl std::fmt::Display) -> Self {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        Self::Unhandled {
            status,
            message: status.canonical_reason().unwrap_or("Internal Server Error").to_string(),
            detail: detail.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (e.status(), ErrorCode::JsonExtraction, e.body_text(), None)
            }
            AppError::UuidError(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidUuid.code(), "UUID error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidUuid,
                    ErrorCode::InvalidUuid.default_message().to_string(),
                    None,
                )
            }
            AppError::Unauthorized(msg) => {
                tracing::info!(error_code = ErrorCode::Unauthorized.code(), "Unauthorized: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::Unauthorized,
                    ErrorCode::Unauthorized.default_message().to_string(),
                    None,
                )
            }
            AppError::Validation { details } => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    %details,
                    "Body validation failed"
                );
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorCode::ValidationError,
                    ErrorCode::ValidationError.default_message().to_string(),
                    Some(details),
                )
            }
            AppError::UnprocessableEntity(msg) => {
                tracing::info!(
                    error_code = ErrorCode::UnprocessableEntity.code(),
                    "Unprocessable entity: {}",
                    msg
                );
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorCode::UnprocessableEntity,
                    ErrorCode::UnprocessableEntity.default_message().to_string(),
                    Some(json!({ "error": msg })),
                )
            }
            AppError::Database(msg) => {
                tracing::error!(error_code = ErrorCode::DatabaseError.code(), "Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DatabaseError,
                    ErrorCode::DatabaseError.default_message().to_string(),
                    Some(json!({ "error": msg })),
                )
            }
            AppError::Unhandled {
                status,
                message,
                detail,
            } => return fallback::render(status, message, detail),
        };

        (status, Json(ErrorResponse::new(code, message, details))).into_response()
    }
}
