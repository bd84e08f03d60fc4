use core_config::{ConfigError, FromEnv, env_required};

/// Shortest accepted HMAC secret
pub const MIN_SECRET_LEN: usize = 32;

/// Shared HS256 secret used to verify bearer tokens.
///
/// Loaded from `JWT_SECRET`; never hard-coded.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        check_secret_len(&secret)?;
        Ok(Self { secret })
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::new(env_required("JWT_SECRET")?)
    }
}

fn check_secret_len(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::ParseError {
            key: "JWT_SECRET".to_string(),
            details: format!(
                "must be at least {MIN_SECRET_LEN} characters (got {}). Generate one with: openssl rand -base64 32",
                secret.len()
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

    #[test]
    fn test_jwt_config_new_valid() {
        let config = JwtConfig::new(SECRET).unwrap();
        assert_eq!(config.secret, SECRET);
    }

    #[test]
    fn test_jwt_config_new_too_short() {
        let err = JwtConfig::new("secretkey").unwrap_err();
        assert!(err.to_string().contains("32 characters"));
    }

    #[test]
    fn test_jwt_config_debug_hides_secret() {
        let config = JwtConfig::new(SECRET).unwrap();
        assert!(!format!("{config:?}").contains(SECRET));
    }

    #[test]
    fn test_jwt_config_from_env_valid() {
        temp_env::with_var("JWT_SECRET", Some(SECRET), || {
            assert_eq!(JwtConfig::from_env().unwrap().secret, SECRET);
        });
    }

    #[test]
    fn test_jwt_config_from_env_missing() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("JWT_SECRET"));
        });
    }
}
