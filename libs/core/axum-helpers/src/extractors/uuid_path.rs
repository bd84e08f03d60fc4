//! UUID path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Single UUID path segment.
///
/// A malformed id is rejected with `400 INVALID_UUID` before the handler runs.
///
/// ```ignore
/// async fn delete_product(UuidPath(id): UuidPath) -> String {
///     format!("deleting {id}")
/// }
///
/// let app = Router::new().route("/products/{id}", delete(delete_product));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        Uuid::parse_str(&raw)
            .map(UuidPath)
            .map_err(|e| AppError::from(e).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new().route(
            "/items/{id}",
            get(|UuidPath(id): UuidPath| async move { id.to_string() }),
        )
    }

    #[tokio::test]
    async fn test_valid_uuid() {
        let id = Uuid::new_v4();
        let response = app()
            .oneshot(Request::get(format!("/items/{id}")).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, id.to_string());
    }

    #[tokio::test]
    async fn test_invalid_uuid_is_400() {
        let response = app()
            .oneshot(Request::get("/items/not-a-uuid").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "INVALID_UUID");
    }
}
