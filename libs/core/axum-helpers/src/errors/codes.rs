//! Error codes carried by every error envelope.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.default_message(), "Body validation failed");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Client errors are 1000-1999, store errors 2000-2999.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request body failed field validation
    ValidationError,

    /// Path id is not a UUID
    InvalidUuid,

    /// Body is not JSON or exceeds the size limit
    JsonExtraction,

    NotFound,

    /// Bearer token missing or invalid
    Unauthorized,

    /// The store refused the document shape
    UnprocessableEntity,

    /// Store command failed
    DatabaseError,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for clients
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// Integer code used in structured logs
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::Unauthorized => 1006,
            Self::UnprocessableEntity => 1009,
            Self::DatabaseError => 2003,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Body validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "The requested resource was not found",
            Self::Unauthorized => "Authentication required",
            Self::UnprocessableEntity => "Schema validation failed",
            Self::DatabaseError => "Something went wrong",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
