use crate::{ConfigError, FromEnv, env_first_of};

/// Origin list variables, first set wins
const ORIGIN_VARS: [&str; 4] = [
    "CORS_ALLOWED_ORIGIN",
    "CLIENTSCORS_ALLOWED_ORIGINS",
    "DEV_CORS_ALLOWED_ORIGIN",
    "DEV_CORS_ALLOWED_ORIGINS",
];

/// Origins allowed to call the API from a browser
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_origins: origins.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a comma-separated origin list, dropping blanks
    pub fn parse_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl FromEnv for CorsConfig {
    /// Reads `CORS_ALLOWED_ORIGIN` (or `CLIENTSCORS_ALLOWED_ORIGINS`), falling
    /// back to `DEV_CORS_ALLOWED_ORIGIN` (or `DEV_CORS_ALLOWED_ORIGINS`).
    /// At least one origin is required.
    fn from_env() -> Result<Self, ConfigError> {
        let raw = env_first_of(&ORIGIN_VARS)?;
        let allowed_origins = Self::parse_list(&raw);

        if allowed_origins.is_empty() {
            return Err(ConfigError::ParseError {
                key: "CORS_ALLOWED_ORIGIN".to_string(),
                details: "at least one origin is required".to_string(),
            });
        }

        Ok(Self { allowed_origins })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every origin variable unset except the given ones
    fn origin_vars<'a>(set: &[(&'a str, &'a str)]) -> Vec<(&'a str, Option<&'a str>)> {
        ORIGIN_VARS
            .iter()
            .map(|key| {
                let value = set.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
                (*key, value)
            })
            .collect()
    }

    #[test]
    fn test_parse_list_trims_and_drops_blanks() {
        let origins = CorsConfig::parse_list(" http://a.test , ,https://b.test,");
        assert_eq!(origins, vec!["http://a.test", "https://b.test"]);
    }

    #[test]
    fn test_from_env_primary() {
        temp_env::with_vars(
            origin_vars(&[
                ("CORS_ALLOWED_ORIGIN", "http://localhost:3000,https://shop.test"),
                ("DEV_CORS_ALLOWED_ORIGIN", "http://ignored.test"),
            ]),
            || {
                let config = CorsConfig::from_env().unwrap();
                assert_eq!(
                    config.allowed_origins,
                    vec!["http://localhost:3000", "https://shop.test"]
                );
            },
        );
    }

    #[test]
    fn test_from_env_dev_fallback() {
        temp_env::with_vars(
            origin_vars(&[("DEV_CORS_ALLOWED_ORIGIN", "http://localhost:5173")]),
            || {
                let config = CorsConfig::from_env().unwrap();
                assert_eq!(config.allowed_origins, vec!["http://localhost:5173"]);
            },
        );
    }

    #[test]
    fn test_from_env_rejects_empty_list() {
        temp_env::with_vars(origin_vars(&[("CORS_ALLOWED_ORIGIN", " , ")]), || {
            assert!(CorsConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_from_env_missing() {
        temp_env::with_vars(origin_vars(&[]), || {
            let err = CorsConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("CORS_ALLOWED_ORIGIN"));
            assert!(err.to_string().contains("DEV_CORS_ALLOWED_ORIGINS"));
        });
    }

    #[test]
    fn test_from_env_accepts_plural_names() {
        temp_env::with_vars(
            origin_vars(&[
                ("CLIENTSCORS_ALLOWED_ORIGINS", "https://client.test"),
                ("DEV_CORS_ALLOWED_ORIGINS", "http://ignored.test"),
            ]),
            || {
                let config = CorsConfig::from_env().unwrap();
                assert_eq!(config.allowed_origins, vec!["https://client.test"]);
            },
        );
        temp_env::with_vars(
            origin_vars(&[("DEV_CORS_ALLOWED_ORIGINS", "http://localhost:5173")]),
            || {
                let config = CorsConfig::from_env().unwrap();
                assert_eq!(config.allowed_origins, vec!["http://localhost:5173"]);
            },
        );
    }
}
