use axum::http::{HeaderValue, Method, header};
use core_config::cors::CorsConfig;
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// CORS layer restricted to the configured origins.
///
/// Methods GET, POST, PUT, DELETE, OPTIONS; headers Content-Type, Authorization,
/// Accept; credentials allowed; preflight cached for an hour.
pub fn create_cors_layer(config: &CorsConfig) -> io::Result<CorsLayer> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {e}"),
            )
        })?;

    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN cannot be empty",
        ));
    }

    tracing::info!(origins = ?config.allowed_origins, "CORS configured");

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unparseable_origin() {
        let config = CorsConfig::new(["http://ok.test", "bad\norigin"]);
        assert!(create_cors_layer(&config).is_err());
    }

    #[test]
    fn test_rejects_empty_list() {
        let config = CorsConfig::new(Vec::<String>::new());
        assert!(create_cors_layer(&config).is_err());
    }

    #[test]
    fn test_accepts_origin_list() {
        let config = CorsConfig::new(["http://localhost:3000", "https://shop.test"]);
        assert!(create_cors_layer(&config).is_ok());
    }
}
