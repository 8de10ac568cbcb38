//! Cross-origin policy layer.
//!
//! Translates `CorsConfig` into a `tower_http` `CorsLayer`. The CORS protocol
//! forbids a literal `*` together with credentials, so when credentials are
//! allowed the wildcard entries mirror the request's `Origin`,
//! `Access-Control-Request-Method` and `Access-Control-Request-Headers` back
//! instead.

use std::time::Duration;

use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

use crate::config::{ConfigError, CorsConfig};

/// Build the CORS layer applied to every route.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, ConfigError> {
    let credentials = config.allow_credentials;

    let origin = match (config.allows_any_origin(), credentials) {
        (true, true) => AllowOrigin::mirror_request(),
        (true, false) => Any.into(),
        (false, _) => AllowOrigin::list(config.origins()?),
    };

    let methods = match (config.allows_any_method(), credentials) {
        (true, true) => AllowMethods::mirror_request(),
        (true, false) => Any.into(),
        (false, _) => AllowMethods::list(config.methods()?),
    };

    let headers = match (config.allows_any_header(), credentials) {
        (true, true) => AllowHeaders::mirror_request(),
        (true, false) => Any.into(),
        (false, _) => AllowHeaders::list(config.headers()?),
    };

    if config.allows_any_origin() {
        tracing::warn!(
            credentials,
            "CORS allows any origin; restrict cors.allow_origins in production"
        );
    }

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(credentials)
        .max_age(Duration::from_secs(config.max_age_seconds)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_builds() {
        assert!(cors_layer(&CorsConfig::default()).is_ok());
    }

    #[test]
    fn test_wildcard_without_credentials_builds() {
        let config = CorsConfig {
            allow_credentials: false,
            ..CorsConfig::default()
        };
        assert!(cors_layer(&config).is_ok());
    }

    #[test]
    fn test_explicit_lists_build() {
        let config = CorsConfig {
            allow_origins: vec!["https://app.example.com".to_string()],
            allow_methods: vec!["GET".to_string(), "POST".to_string()],
            allow_headers: vec!["content-type".to_string()],
            ..CorsConfig::default()
        };
        assert!(cors_layer(&config).is_ok());
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let config = CorsConfig {
            allow_origins: vec!["https://bad\norigin".to_string()],
            ..CorsConfig::default()
        };
        assert!(matches!(cors_layer(&config), Err(ConfigError::Validation(_))));
    }
}
