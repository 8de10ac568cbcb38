//! Configuration loading and constants.
//!
//! Loads application configuration from a TOML file and defines the defaults
//! used when a section or the whole file is absent. `AppConfig` is the root
//! configuration struct containing all settings.

use std::net::SocketAddr;
use std::path::Path;

use const_format::formatcp;
use http::{HeaderName, HeaderValue, Method};
use serde::Deserialize;

// =============================================================================
// Service Identity
// =============================================================================

/// Public name of the service
pub const SERVICE_NAME: &str = "IntelliView API";

/// Greeting returned by `GET /`
pub const WELCOME_MESSAGE: &str = formatcp!("Welcome to {}!", SERVICE_NAME);

/// Status literal returned by `GET /health`
pub const HEALTH_STATUS_OK: &str = "ok";

// =============================================================================
// HTTP Defaults
// =============================================================================

/// Listen on all interfaces by default
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Time allowed for in-flight connections to drain on shutdown
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;

/// Health probes must never be answered from an intermediate cache
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

/// Path of the generated OpenAPI document
pub const OPENAPI_PATH: &str = "/openapi.json";

/// Mount point of the interactive Swagger UI
pub const SWAGGER_UI_PATH: &str = "/docs";

/// Response header carrying the per-request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// CORS Defaults
// =============================================================================

/// Wildcard entry accepted in origin, method and header lists
pub const CORS_WILDCARD: &str = "*";

/// Preflight cache lifetime in seconds
pub const DEFAULT_CORS_MAX_AGE_SECS: u64 = 600;

// =============================================================================
// Logging Defaults
// =============================================================================

/// Default log filter when neither `--log-level` nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "intelliview=info,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

const LOG_FORMATS: [&str; 2] = ["text", "json"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP listener configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Cross-origin policy applied to every route
    #[serde(default)]
    pub cors: CorsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    /// Seconds to wait for open connections after a shutdown signal
    #[serde(default = "HttpServerConfig::default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_grace_seconds: Self::default_shutdown_grace(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }

    fn default_shutdown_grace() -> u64 {
        DEFAULT_SHUTDOWN_GRACE_SECS
    }

    /// Socket address the listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                ConfigError::Validation(format!(
                    "Invalid http.host or http.port '{}:{}': {}",
                    self.host, self.port, e
                ))
            })
    }
}

/// Cross-origin resource sharing policy.
///
/// The defaults accept every origin, method and header and allow credentials.
/// That is convenient during development but should be narrowed to the
/// frontend's origin in production.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins; `"*"` allows any origin
    #[serde(default = "CorsConfig::wildcard")]
    pub allow_origins: Vec<String>,
    /// Whether browsers may send cookies and authorization headers
    #[serde(default = "CorsConfig::default_allow_credentials")]
    pub allow_credentials: bool,
    /// Allowed methods; `"*"` allows any method
    #[serde(default = "CorsConfig::wildcard")]
    pub allow_methods: Vec<String>,
    /// Allowed request headers; `"*"` allows any header
    #[serde(default = "CorsConfig::wildcard")]
    pub allow_headers: Vec<String>,
    /// Preflight cache lifetime in seconds
    #[serde(default = "CorsConfig::default_max_age")]
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: Self::wildcard(),
            allow_credentials: Self::default_allow_credentials(),
            allow_methods: Self::wildcard(),
            allow_headers: Self::wildcard(),
            max_age_seconds: Self::default_max_age(),
        }
    }
}

impl CorsConfig {
    fn wildcard() -> Vec<String> {
        vec![CORS_WILDCARD.to_string()]
    }

    fn default_allow_credentials() -> bool {
        true
    }

    fn default_max_age() -> u64 {
        DEFAULT_CORS_MAX_AGE_SECS
    }

    pub fn allows_any_origin(&self) -> bool {
        is_wildcard(&self.allow_origins)
    }

    pub fn allows_any_method(&self) -> bool {
        is_wildcard(&self.allow_methods)
    }

    pub fn allows_any_header(&self) -> bool {
        is_wildcard(&self.allow_headers)
    }

    /// Parse the explicit origin list into header values.
    pub fn origins(&self) -> Result<Vec<HeaderValue>, ConfigError> {
        self.allow_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| {
                    ConfigError::Validation(format!("Invalid CORS origin: {:?}", origin))
                })
            })
            .collect()
    }

    /// Parse the explicit method list.
    pub fn methods(&self) -> Result<Vec<Method>, ConfigError> {
        self.allow_methods
            .iter()
            .map(|method| {
                Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(|_| {
                    ConfigError::Validation(format!("Invalid CORS method: {:?}", method))
                })
            })
            .collect()
    }

    /// Parse the explicit request header list.
    pub fn headers(&self) -> Result<Vec<HeaderName>, ConfigError> {
        self.allow_headers
            .iter()
            .map(|header| {
                HeaderName::from_bytes(header.as_bytes()).map_err(|_| {
                    ConfigError::Validation(format!("Invalid CORS header: {:?}", header))
                })
            })
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.allow_origins.is_empty() {
            return Err(ConfigError::Validation(
                "cors.allow_origins must not be empty; use [\"*\"] to allow any origin".to_string(),
            ));
        }
        if !self.allows_any_origin() {
            self.origins()?;
        }
        if !self.allows_any_method() {
            self.methods()?;
        }
        if !self.allows_any_header() {
            self.headers()?;
        }
        Ok(())
    }
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v == CORS_WILDCARD)
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl AppConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load from `path` when given, otherwise use built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Unknown logging.format {:?}, expected \"text\" or \"json\"",
                self.logging.format
            )));
        }
        self.http.socket_addr()?;
        self.cors.validate()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_welcome_message() {
        assert_eq!(WELCOME_MESSAGE, "Welcome to IntelliView API!");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 8000);
        assert_eq!(config.http.shutdown_grace_seconds, 30);
        assert!(config.cors.allows_any_origin());
        assert!(config.cors.allows_any_method());
        assert!(config.cors.allows_any_header());
        assert!(config.cors.allow_credentials);
        assert_eq!(config.cors.max_age_seconds, 600);
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = AppConfig::load_or_default(None::<&str>).unwrap();
        assert_eq!(
            config.http.socket_addr().unwrap(),
            "0.0.0.0:8000".parse().unwrap()
        );
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml(
            r#"
            [http]
            port = 9000

            [cors]
            allow_origins = ["https://app.example.com"]
            "#,
        )
        .unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 9000);
        assert!(!config.cors.allows_any_origin());
        assert!(config.cors.allows_any_method());
        assert_eq!(
            config.cors.origins().unwrap(),
            vec![HeaderValue::from_static("https://app.example.com")]
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[http]\nhost = \"127.0.0.1\"\nport = 8080\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, 8080);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load("/nonexistent/intelliview.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = AppConfig::from_toml("[http]\nprot = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_bad_log_format() {
        let err = AppConfig::from_toml("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_bad_host() {
        let err = AppConfig::from_toml("[http]\nhost = \"not a host\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_bad_cors_values() {
        for toml in [
            "[cors]\nallow_origins = [\"https://bad\\norigin\"]\n",
            "[cors]\nallow_methods = [\"GET POST\"]\n",
            "[cors]\nallow_headers = [\"x bad\"]\n",
            "[cors]\nallow_origins = []\n",
        ] {
            let err = AppConfig::from_toml(toml).unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)), "{toml}");
        }
    }

    #[test]
    fn test_methods_are_normalized() {
        let config = AppConfig::from_toml("[cors]\nallow_methods = [\"get\", \"Post\"]\n").unwrap();
        assert_eq!(config.cors.methods().unwrap(), vec![Method::GET, Method::POST]);
    }
}
