//! Database connectors and utilities.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB connection config, connector and health checks
//! - `config` - `core_config::FromEnv` support for the config types
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::new("mongodb://localhost:27017").with_database("shop");
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = database::mongodb::resolve_database(&client, &config);
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
