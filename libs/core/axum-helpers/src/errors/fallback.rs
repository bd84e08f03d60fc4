//! Process-wide responder for failures that handlers do not shape themselves.
//!
//! [`AppError::Unhandled`](super::AppError::Unhandled) renders `{"error": message}`
//! and records the underlying cause as a [`FailureDetail`] response extension.
//! [`expose_failure_detail`] copies that cause into the body as `detail`, but only
//! when the environment allows it.

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use core_config::Environment;
use serde_json::json;

/// Cause of an unhandled failure, kept out of the body by default
#[derive(Debug, Clone)]
pub struct FailureDetail {
    pub message: String,
    pub detail: String,
}

pub(crate) fn render(status: StatusCode, message: String, detail: String) -> Response {
    tracing::error!(status = status.as_u16(), %detail, "Unhandled error: {}", message);

    let mut response = (status, Json(json!({ "error": message }))).into_response();
    response
        .extensions_mut()
        .insert(FailureDetail { message, detail });
    response
}

/// Middleware adding `detail` to fallback error bodies outside production.
///
/// ```ignore
/// let app = router.layer(axum::middleware::from_fn_with_state(
///     Environment::from_env(),
///     expose_failure_detail,
/// ));
/// ```
pub async fn expose_failure_detail(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if !environment.exposes_error_detail() {
        return response;
    }
    let Some(failure) = response.extensions().get::<FailureDetail>().cloned() else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    let body = json!({ "error": failure.message, "detail": failure.detail });
    (parts, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use axum::{Router, body::Body, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app(environment: Environment) -> Router {
        Router::new()
            .route(
                "/boom",
                get(|| async { Err::<(), _>(AppError::unhandled("socket closed")) }),
            )
            .route("/ok", get(|| async { "fine" }))
            .layer(axum::middleware::from_fn_with_state(
                environment,
                expose_failure_detail,
            ))
    }

    async fn call(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(axum::http::Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_development_exposes_detail() {
        let (status, body) = call(app(Environment::Development), "/boom").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal Server Error");
        assert_eq!(json["detail"], "socket closed");
    }

    #[tokio::test]
    async fn test_production_hides_detail() {
        let (status, body) = call(app(Environment::Production), "/boom").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "error": "Internal Server Error" }));
    }

    #[tokio::test]
    async fn test_other_responses_untouched() {
        let (status, body) = call(app(Environment::Development), "/ok").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"fine");
    }
}
