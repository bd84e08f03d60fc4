//! MongoDB connection management and health checks.

mod config;
mod connector;
mod health;

pub use config::{FALLBACK_DATABASE, MongoConfig};
pub use connector::{connect_from_config, connect_from_config_with_retry, resolve_database};
pub use health::check_health;

pub use mongodb::{Client, Collection, Database};
