use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by a bearer token.
///
/// No claim is mandatory; `exp` is enforced only when the token has one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JwtClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No bearer token provided")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();
    validation.validate_exp = true;
    validation
}

/// Verify an HS256 token against `key` and return its claims.
pub fn verify_token(token: &str, key: &DecodingKey) -> Result<JwtClaims, AuthError> {
    let data = decode::<JwtClaims>(token, key, &validation())?;
    Ok(data.claims)
}

/// HS256 keys derived from [`JwtConfig`]
#[derive(Clone)]
pub struct JwtAuth {
    decoding: DecodingKey,
    encoding: EncodingKey,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.as_bytes();
        tracing::info!("JWT verification initialized");
        Self {
            decoding: DecodingKey::from_secret(secret),
            encoding: EncodingKey::from_secret(secret),
        }
    }

    /// Verify an optional bearer token; `None` is [`AuthError::MissingToken`].
    pub fn authorize(&self, token: Option<&str>) -> Result<JwtClaims, AuthError> {
        let token = token.ok_or(AuthError::MissingToken)?;
        verify_token(token, &self.decoding)
    }

    /// Sign a token for `sub` valid for `ttl_seconds`.
    pub fn issue(&self, sub: &str, ttl_seconds: i64) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: Some(sub.to_string()),
            exp: Some((now + Duration::seconds(ttl_seconds)).timestamp()),
            iat: Some(now.timestamp()),
            extra: serde_json::Map::new(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(secret: &str) -> JwtAuth {
        JwtAuth::new(&JwtConfig::new(secret).unwrap())
    }

    const SECRET: &str = "products-api-test-secret-0123456789";

    #[test]
    fn test_issue_then_verify() {
        let auth = auth(SECRET);
        let token = auth.issue("admin", 60).unwrap();
        let claims = auth.authorize(Some(&token)).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("admin"));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = auth(SECRET).issue("admin", 60).unwrap();
        let result = auth("another-secret-that-is-long-enough!!").authorize(Some(&token));
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = auth(SECRET).issue("admin", -3600).unwrap();
        assert!(auth(SECRET).authorize(Some(&token)).is_err());
    }

    #[test]
    fn test_token_without_exp_is_accepted() {
        let key = EncodingKey::from_secret(SECRET.as_bytes());
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "user": "legacy" }),
            &key,
        )
        .unwrap();

        let claims = verify_token(&token, &DecodingKey::from_secret(SECRET.as_bytes())).unwrap();
        assert_eq!(claims.exp, None);
        assert_eq!(claims.extra["user"], "legacy");
    }

    #[test]
    fn test_garbage_and_missing_tokens() {
        let auth = auth(SECRET);
        assert!(matches!(
            auth.authorize(Some("not.a.token")),
            Err(AuthError::InvalidToken(_))
        ));
        assert!(matches!(auth.authorize(None), Err(AuthError::MissingToken)));
    }
}
