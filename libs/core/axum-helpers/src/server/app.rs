use super::shutdown::ShutdownCoordinator;
use crate::errors::{expose_failure_detail, handlers::not_found};
use crate::http::{ClientRateLimiter, create_cors_layer, rate_limit, security_headers};
use axum::{Router, extract::DefaultBodyLimit, middleware};
use core_config::{
    Environment, cors::CorsConfig, rate_limit::RateLimitConfig, server::ServerConfig,
};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Settings for the layers [`create_router`] wraps around every route
#[derive(Clone, Debug)]
pub struct HttpLayers {
    pub environment: Environment,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub body_limit_bytes: usize,
}

/// Router with API docs, the fallback 404 and the cross-cutting layers.
///
/// `apis` is merged at the root and must already have its state applied.
/// Docs are served at `/swagger-ui`, `/redoc`, `/rapidoc` and `/scalar`,
/// with the document at `/api-docs/openapi.json`.
///
/// Layers, outermost first: compression, CORS, per-IP rate limit, security
/// headers, request tracing, body size limit, fallback error detail.
///
/// ```ignore
/// #[derive(OpenApi)]
/// #[openapi(paths(/* ... */))]
/// struct ApiDoc;
///
/// let router = create_router::<ApiDoc>(products_router, &layers)?;
/// ```
pub fn create_router<T>(apis: Router, layers: &HttpLayers) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let cors_layer = create_cors_layer(&layers.cors)?;
    let limiter = ClientRateLimiter::new(&layers.rate_limit);
    limiter.spawn_pruning(layers.rate_limit.window.max(Duration::from_secs(1)));

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .merge(apis)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            layers.environment.clone(),
            expose_failure_detail,
        ))
        .layer(DefaultBodyLimit::max(layers.body_limit_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn_with_state(limiter, rate_limit))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serve `router` until SIGINT/SIGTERM, then run `cleanup` within `shutdown_timeout`.
///
/// Peer addresses are recorded as `ConnectInfo<SocketAddr>` for the rate
/// limiter and audit log.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let (coordinator, _rx) = ShutdownCoordinator::new();
    let shutdown_handle = coordinator.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        shutdown_handle.wait_for_signal().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(()) => info!("Cleanup completed successfully"),
            Err(_) => tracing::warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let serve_result = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { coordinator.wait_for_signal().await })
    .await
    .inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e));

    cleanup_handle.await.ok();

    serve_result
}
