//! Bearer-token authorization.
//!
//! Tokens are HS256 JWTs signed with a shared secret from [`JwtConfig`].
//! Handlers extract a [`BearerToken`] and the domain decides when to call
//! [`JwtAuth::authorize`], so body validation can run first.
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//! let claims = auth.authorize(token.as_deref())?;
//! ```

pub mod bearer;
pub mod config;
pub mod jwt;

pub use bearer::{BearerToken, extract_bearer};
pub use config::JwtConfig;
pub use jwt::{AuthError, JwtAuth, JwtClaims, verify_token};
