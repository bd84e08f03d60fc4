use super::client_ip::{client_ip, peer_ip};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use core_config::rate_limit::RateLimitConfig;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

/// Per-IP GCRA limiter shared by all requests.
///
/// A client may burst up to `max_requests`, and regains one request every
/// `window / max_requests`. Clients are keyed on the socket peer unless the
/// config trusts a proxy to set `X-Forwarded-For`.
#[derive(Clone)]
pub struct ClientRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
    trust_proxy: bool,
}

impl ClientRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let burst = NonZeroU32::new(config.max_requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(config.window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        tracing::info!(
            max_requests = config.max_requests,
            window_secs = config.window.as_secs(),
            trust_proxy = config.trust_proxy,
            "Rate limiting configured"
        );

        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            trust_proxy: config.trust_proxy,
        }
    }

    /// Key for the request: the socket peer, or the forwarded client behind a
    /// trusted proxy. Requests without either share one bucket.
    pub fn client_key(&self, request: &Request) -> IpAddr {
        let ip = if self.trust_proxy {
            client_ip(request.headers(), request.extensions())
        } else {
            peer_ip(request.extensions())
        };
        ip.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }

    /// Whether `ip` may make another request now
    pub fn check(&self, ip: IpAddr) -> bool {
        self.limiter.check_key(&ip).is_ok()
    }

    /// Drop state for clients whose budget has fully recovered
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
    }

    /// Prune idle client state every `interval` on the current runtime.
    ///
    /// Does nothing outside a Tokio runtime.
    pub fn spawn_pruning(&self, interval: Duration) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let limiter = self.clone();
        runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                limiter.retain_recent();
                tracing::debug!(clients = limiter.limiter.len(), "Pruned rate limiter state");
            }
        });
    }
}

/// Middleware rejecting over-budget clients with `429` and a plain-text message.
pub async fn rate_limit(
    State(limiter): State<ClientRateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let ip = limiter.client_key(&request);

    if limiter.check(ip) {
        return next.run(request).await;
    }

    tracing::warn!(%ip, "Rate limit exceeded");
    (StatusCode::TOO_MANY_REQUESTS, RATE_LIMIT_MESSAGE).into_response()
}
