//! Reusable OpenAPI response types.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 2003,
        "error": "DATABASE_ERROR",
        "message": "Something went wrong",
        "details": { "error": "connection closed" }
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Body validation failed",
    content_type = "application/json",
    example = json!({
        "code": 1001,
        "error": "VALIDATION_ERROR",
        "message": "Body validation failed",
        "details": [
            { "field": "name", "message": "Invalid value" },
            { "field": "price", "message": "Invalid value" }
        ]
    })
)]
pub struct ValidationErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Schema validation failed",
    content_type = "application/json",
    example = json!({
        "code": 1009,
        "error": "UNPROCESSABLE_ENTITY",
        "message": "Schema validation failed",
        "details": { "error": "Document failed validation" }
    })
)]
pub struct UnprocessableEntityResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid UUID",
    content_type = "application/json",
    example = json!({
        "code": 1002,
        "error": "INVALID_UUID",
        "message": "Invalid UUID format"
    })
)]
pub struct BadRequestUuidResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unauthorized - missing or invalid bearer token",
    content_type = "application/json",
    example = json!({
        "code": 1006,
        "error": "UNAUTHORIZED",
        "message": "Authentication required"
    })
)]
pub struct UnauthorizedResponse(pub ErrorResponse);
