//! Products API - REST server

use axum_helpers::server::{create_production_app, create_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::{connect_from_config_with_retry, resolve_database};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(database = ?config.mongodb.database, "Connecting to MongoDB");

    let mongo_client = connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = resolve_database(&mongo_client, &config.mongodb);

    info!("Successfully connected to MongoDB database: {}", db.name());

    let state = AppState {
        config: config.clone(),
        mongo_client,
        db,
    };

    api::init_indexes(&state).await?;

    let router = create_router::<openapi::ApiDoc>(api::routes(&state), &config.http_layers())?;

    info!(
        "Starting {} v{} on port {}",
        config.app.name, config.app.version, config.server.port
    );

    let mongo_client = state.mongo_client.clone();
    create_production_app(
        router,
        &config.server,
        config.server.shutdown_timeout,
        async move {
            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connection closed");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
