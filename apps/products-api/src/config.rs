//! Configuration for Products API

use axum_helpers::{HttpLayers, JwtConfig};
use core_config::{
    AppInfo, FromEnv, app_info, cors::CorsConfig, rate_limit::RateLimitConfig,
    server::ServerConfig,
};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub jwt: JwtConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            mongodb: MongoConfig::from_env()?,
            server: ServerConfig::from_env()?,
            cors: CorsConfig::from_env()?,
            rate_limit: RateLimitConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
        })
    }

    pub fn http_layers(&self) -> HttpLayers {
        HttpLayers {
            environment: self.environment.clone(),
            cors: self.cors.clone(),
            rate_limit: self.rate_limit.clone(),
            body_limit_bytes: self.server.body_limit_bytes,
        }
    }
}
