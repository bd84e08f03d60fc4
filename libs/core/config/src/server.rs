use crate::{ConfigError, FromEnv, env_or_default, env_parse_or};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Largest accepted request body, matching a typical JSON API limit
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 100 * 1024;

/// HTTP listener settings
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            ..Self::default()
        }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables:
    /// - HOST: defaults to 0.0.0.0
    /// - PORT: defaults to 8080
    /// - BODY_LIMIT_BYTES: defaults to 100 KiB
    /// - SHUTDOWN_TIMEOUT_SECS: defaults to 30
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse_or("PORT", 8080u16)?;
        let body_limit_bytes = env_parse_or("BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT_BYTES)?;
        let shutdown_secs = env_parse_or("SHUTDOWN_TIMEOUT_SECS", 30u64)?;

        Ok(Self {
            host,
            port,
            body_limit_bytes,
            shutdown_timeout: Duration::from_secs(shutdown_secs),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 8080,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}
