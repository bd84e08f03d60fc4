//! Cross-cutting HTTP layers.
//!
//! ```ignore
//! use axum_helpers::http::{ClientRateLimiter, create_cors_layer, rate_limit, security_headers};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn(security_headers))
//!     .layer(axum::middleware::from_fn_with_state(ClientRateLimiter::new(&limits), rate_limit))
//!     .layer(create_cors_layer(&cors)?);
//! ```

pub mod client_ip;
pub mod cors;
pub mod rate_limit;
pub mod security;

pub use client_ip::{client_ip, peer_ip};
pub use cors::create_cors_layer;
pub use rate_limit::{ClientRateLimiter, RATE_LIMIT_MESSAGE, rate_limit};
pub use security::security_headers;
