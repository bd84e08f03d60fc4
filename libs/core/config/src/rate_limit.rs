use crate::{ConfigError, FromEnv, env_parse_or};
use std::time::Duration;

/// Default request budget per client per window
pub const DEFAULT_MAX_REQUESTS: u32 = 10_000;
/// Default window length (15 minutes)
pub const DEFAULT_WINDOW_SECS: u64 = 15 * 60;

/// Per-client request rate cap
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
    /// Key clients on `X-Forwarded-For`/`X-Real-IP` instead of the socket peer.
    /// Only safe behind a proxy that overwrites those headers.
    pub trust_proxy: bool,
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            trust_proxy: false,
        }
    }

    pub fn with_trusted_proxy(mut self) -> Self {
        self.trust_proxy = true;
        self
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window: Duration::from_secs(DEFAULT_WINDOW_SECS),
            trust_proxy: false,
        }
    }
}

impl FromEnv for RateLimitConfig {
    /// Reads `RATE_LIMIT_MAX` and `RATE_LIMIT_WINDOW_SECS` (both non-zero) and
    /// `RATE_LIMIT_TRUST_PROXY` (default `false`).
    fn from_env() -> Result<Self, ConfigError> {
        let max_requests: u32 = env_parse_or("RATE_LIMIT_MAX", DEFAULT_MAX_REQUESTS)?;
        let window_secs: u64 = env_parse_or("RATE_LIMIT_WINDOW_SECS", DEFAULT_WINDOW_SECS)?;
        let trust_proxy: bool = env_parse_or("RATE_LIMIT_TRUST_PROXY", false)?;

        if max_requests == 0 {
            return Err(ConfigError::ParseError {
                key: "RATE_LIMIT_MAX".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }
        if window_secs == 0 {
            return Err(ConfigError::ParseError {
                key: "RATE_LIMIT_WINDOW_SECS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            trust_proxy,
            ..Self::new(max_requests, Duration::from_secs(window_secs))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("RATE_LIMIT_MAX", None::<&str>),
                ("RATE_LIMIT_WINDOW_SECS", None::<&str>),
                ("RATE_LIMIT_TRUST_PROXY", None::<&str>),
            ],
            || {
                let config = RateLimitConfig::from_env().unwrap();
                assert_eq!(config, RateLimitConfig::default());
                assert_eq!(config.window, Duration::from_secs(900));
                assert!(!config.trust_proxy);
            },
        );
    }

    #[test]
    fn test_custom_values() {
        temp_env::with_vars(
            [
                ("RATE_LIMIT_MAX", Some("50")),
                ("RATE_LIMIT_WINDOW_SECS", Some("60")),
                ("RATE_LIMIT_TRUST_PROXY", Some("true")),
            ],
            || {
                let config = RateLimitConfig::from_env().unwrap();
                assert_eq!(config.max_requests, 50);
                assert_eq!(config.window, Duration::from_secs(60));
                assert!(config.trust_proxy);
            },
        );
    }

    #[test]
    fn test_zero_is_rejected() {
        temp_env::with_var("RATE_LIMIT_MAX", Some("0"), || {
            let err = RateLimitConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("RATE_LIMIT_MAX"));
        });
    }

    #[test]
    fn test_trust_proxy_must_be_a_bool() {
        temp_env::with_var("RATE_LIMIT_TRUST_PROXY", Some("yes"), || {
            let err = RateLimitConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("RATE_LIMIT_TRUST_PROXY"));
        });
    }
}
