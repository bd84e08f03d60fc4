use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff policy for establishing a connection at startup.
///
/// Request-time store operations are never retried; this is only used while
/// the process is coming up and the database may not be reachable yet.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds
    pub initial_delay_ms: u64,
    /// Upper bound for any single delay in milliseconds
    pub max_delay_ms: u64,
    /// Growth factor between consecutive delays
    pub backoff_multiplier: f64,
    /// Scale each delay into [50%, 100%] of its nominal value
    pub use_jitter: bool,
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    /// Nominal (pre-jitter) delay before retry number `retry` (1-based)
    pub fn nominal_delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1) as i32;
        let millis = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        Duration::from_millis((millis as u64).min(self.max_delay_ms))
    }

    fn delay(&self, retry: u32) -> Duration {
        let nominal = self.nominal_delay(retry);
        if self.use_jitter {
            Duration::from_millis(apply_jitter(nominal.as_millis() as u64))
        } else {
            nominal
        }
    }
}

impl Default for RetryConfig {
    /// 3 retries starting at 100 ms, doubling up to 5 s, with jitter
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Run `operation` until it succeeds or the retry budget is spent.
///
/// Returns the last error once `config.max_retries` retries have failed.
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut retries = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if retries > 0 {
                    debug!(retries, "Operation succeeded after retrying");
                }
                return Ok(value);
            }
            Err(e) if retries >= config.max_retries => {
                warn!(attempts = retries + 1, error = %e, "Giving up");
                return Err(e);
            }
            Err(e) => {
                retries += 1;
                let delay = config.delay(retries);
                debug!(
                    retry = retries,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Scale `delay` by a pseudo-random factor in [0.5, 1.0)
fn apply_jitter(delay: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let factor = (RandomState::new().hash_one(std::time::SystemTime::now()) % 50) as f64 / 100.0 + 0.5;
    (delay as f64 * factor) as u64
}
