use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;

const PREFLIGHT_MAX_AGE_SECS: u64 = 86400;

// Credentials are allowed, so a wildcard origin is never valid here; local
// dev origins are the fallback when nothing is configured.
const DEFAULT_DEV_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:5173"];

pub fn create_cors_layer(config: &Config) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(config))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
        ])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(PREFLIGHT_MAX_AGE_SECS))
}

fn allowed_origins(config: &Config) -> AllowOrigin {
    let origins: Vec<HeaderValue> = config
        .client_urls
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS: No client URLs configured, falling back to dev origins");
        AllowOrigin::list(
            DEFAULT_DEV_ORIGINS
                .iter()
                .map(|o| o.parse::<HeaderValue>().expect("static origin is valid")),
        )
    } else {
        tracing::info!("CORS: Configured with {} allowed origin(s)", origins.len());
        AllowOrigin::list(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(origins: &[&str]) -> Config {
        Config {
            database_url: String::new(),
            port: 0,
            jwt_secret: String::new(),
            token_ttl_hours: 1,
            client_urls: origins.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn layer_builds_with_configured_origins() {
        let _layer = create_cors_layer(&config_with(&["http://localhost:5173"]));
    }

    #[test]
    fn layer_builds_with_no_origins() {
        let _layer = create_cors_layer(&config_with(&[]));
    }

    #[test]
    fn default_dev_origins_are_valid() {
        for origin in DEFAULT_DEV_ORIGINS {
            assert!(origin.parse::<HeaderValue>().is_ok());
        }
    }
}
