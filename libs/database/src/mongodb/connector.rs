use mongodb::{Client, Database, options::ClientOptions};
use std::time::Duration;
use tracing::{info, instrument};

use super::MongoConfig;
use super::config::FALLBACK_DATABASE;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};

/// Build a client from `config` and verify the server answers a ping.
#[instrument(skip(config), fields(app_name = ?config.app_name))]
pub async fn connect_from_config(config: &MongoConfig) -> DatabaseResult<Client> {
    let mut options = ClientOptions::parse(&config.url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));
    if let Some(app_name) = &config.app_name {
        options.app_name = Some(app_name.clone());
    }

    let client = Client::with_options(options)?;

    super::check_health(&client)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Connected to MongoDB");
    Ok(client)
}

/// [`connect_from_config`] retried with exponential backoff.
///
/// Only meant for startup, when the server may still be coming up.
pub async fn connect_from_config_with_retry(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<Client> {
    retry_with_backoff(
        || connect_from_config(config),
        retry_config.unwrap_or_default(),
    )
    .await
}

/// Pick the database: the configured name, else the one in the URI, else `"default"`.
pub fn resolve_database(client: &Client, config: &MongoConfig) -> Database {
    let name = database_name(config.database.as_deref(), client.default_database().as_ref());
    info!(database = %name, "Using MongoDB database");
    client.database(&name)
}

fn database_name(configured: Option<&str>, from_uri: Option<&Database>) -> String {
    configured
        .map(str::to_string)
        .or_else(|| from_uri.map(|db| db.name().to_string()))
        .unwrap_or_else(|| FALLBACK_DATABASE.to_string())
}
