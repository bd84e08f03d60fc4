use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{ErrorCode, ErrorResponse};

/// Router fallback for unmatched routes.
pub async fn not_found() -> Response {
    let body = ErrorResponse::new(ErrorCode::NotFound, ErrorCode::NotFound.default_message(), None);
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
