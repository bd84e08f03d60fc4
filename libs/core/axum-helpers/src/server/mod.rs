//! Router assembly, health endpoints and graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::app_info;
//!
//! let router = create_router::<ApiDoc>(api_routes.merge(health_router(app_info!())), &layers)?;
//! create_production_app(router, &server_config, server_config.shutdown_timeout, cleanup).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{HttpLayers, create_production_app, create_router};
pub use health::{
    HealthCheckFuture, HealthResponse, ReadyResponse, health_handler, health_router,
    run_health_checks,
};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
