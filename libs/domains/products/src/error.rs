use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, AuthError};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// MongoDB's `DocumentValidationFailure` server code
const DOCUMENT_VALIDATION_FAILURE: i32 = 121;

/// One rejected request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Body validation failed: {} field(s) rejected", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    /// The store refused the document's shape
    #[error("Schema validation failed: {0}")]
    SchemaViolation(String),

    #[error("Database error: {0}")]
    Store(String),
}

impl ProductError {
    /// Collapse shape errors into store errors for callers that report them alike
    pub fn into_store(self) -> Self {
        match self {
            ProductError::SchemaViolation(msg) => ProductError::Store(msg),
            other => other,
        }
    }
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Validation(fields) => AppError::Validation {
                details: serde_json::to_value(fields).unwrap_or_default(),
            },
            ProductError::Unauthorized(e) => AppError::Unauthorized(e.to_string()),
            ProductError::SchemaViolation(msg) => AppError::UnprocessableEntity(msg),
            ProductError::Store(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write))
                if write.code == DOCUMENT_VALIDATION_FAILURE =>
            {
                ProductError::SchemaViolation(write.message.clone())
            }
            ErrorKind::BsonSerialization(e) => ProductError::SchemaViolation(e.to_string()),
            _ => ProductError::Store(err.to_string()),
        }
    }
}

impl From<mongodb::bson::ser::Error> for ProductError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ProductError::SchemaViolation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ProductError::Validation(vec![FieldError::new("name", "name must be specified")]),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ProductError::Unauthorized(AuthError::MissingToken),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ProductError::SchemaViolation("bad type".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ProductError::Store("timeout".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_into_store_only_touches_schema_violations() {
        assert!(matches!(
            ProductError::SchemaViolation("x".into()).into_store(),
            ProductError::Store(msg) if msg == "x"
        ));
        assert!(matches!(
            ProductError::Unauthorized(AuthError::MissingToken).into_store(),
            ProductError::Unauthorized(_)
        ));
    }
}
