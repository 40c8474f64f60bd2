use axum::http::{HeaderValue, Method, header};
use core_config::Environment;
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// CORS for browser clients of the API: credentials allowed, 1h preflight cache.
pub fn create_cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
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
        .max_age(Duration::from_secs(3600))
}

/// Builds the CORS layer from `CORS_ALLOWED_ORIGIN` (comma-separated).
///
/// Required in production. In development an unset variable falls back to a
/// permissive layer so local frontends work out of the box.
pub fn cors_layer_from_env(environment: Environment) -> io::Result<CorsLayer> {
    let raw = match std::env::var("CORS_ALLOWED_ORIGIN") {
        Ok(raw) => raw,
        Err(_) if environment.is_development() => {
            tracing::warn!("CORS_ALLOWED_ORIGIN not set, allowing any origin (development)");
            return Ok(CorsLayer::permissive());
        }
        Err(_) => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "CORS_ALLOWED_ORIGIN is required in production. Example: CORS_ALLOWED_ORIGIN=https://agrimarket.example",
            ));
        }
    };

    let origins = parse_origins(&raw)?;
    tracing::info!(origins = %raw, "CORS configured");
    Ok(create_cors_layer(origins))
}

fn parse_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(HeaderValue::from_str)
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

    Ok(origins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins("http://localhost:3000, https://agrimarket.example,").unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1], "https://agrimarket.example");
    }

    #[test]
    fn test_parse_origins_empty() {
        assert!(parse_origins(" , ").is_err());
    }

    #[test]
    fn test_production_requires_origins() {
        temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            assert!(cors_layer_from_env(Environment::Production).is_err());
            assert!(cors_layer_from_env(Environment::Development).is_ok());
        });
    }
}
