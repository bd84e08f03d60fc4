//! # Axum Helpers
//!
//! Shared HTTP plumbing for the workspace's services.
//!
//! - **[`auth`]**: HS256 bearer-token verification
//! - **[`server`]**: router assembly with API docs, health checks, graceful shutdown
//! - **[`http`]**: CORS, security headers, per-IP rate limiting
//! - **[`errors`]**: error envelope, error codes, fallback error responder
//! - **[`extractors`]**: UUID path extractor
//! - **[`audit`]**: audit events for mutating requests
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum_helpers::server::{HttpLayers, create_production_app, create_router};
//!
//! let router = create_router::<ApiDoc>(api_routes, &layers)?;
//! create_production_app(router, &server_config, server_config.shutdown_timeout, async {}).await?;
//! ```

pub mod audit;
pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{AuthError, BearerToken, JwtAuth, JwtClaims, JwtConfig};

pub use server::{
    HealthCheckFuture, HealthResponse, HttpLayers, ReadyResponse, ShutdownCoordinator,
    create_production_app, create_router, health_router, run_health_checks, shutdown_signal,
};

pub use http::{ClientRateLimiter, create_cors_layer, rate_limit, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::UuidPath;

pub use audit::{AuditContext, AuditEvent, AuditOutcome};
