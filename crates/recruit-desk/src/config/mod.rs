use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub upstream: UpstreamConfig,
    pub views: ViewConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let base_url = env::var("APP_UPSTREAM_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080/api".to_string());
        let upstream = UpstreamConfig::new(
            base_url,
            positive_var("APP_UPSTREAM_TIMEOUT_SECS", 15)
                .map_err(|value| ConfigError::InvalidNumber {
                    variable: "APP_UPSTREAM_TIMEOUT_SECS",
                    value,
                })?,
        )?;

        let page_size = positive_var("APP_PAGE_SIZE", 10).map_err(|value| {
            ConfigError::InvalidNumber {
                variable: "APP_PAGE_SIZE",
                value,
            }
        })?;
        let recent_limit = positive_var("APP_RECENT_LIMIT", 2).map_err(|value| {
            ConfigError::InvalidNumber {
                variable: "APP_RECENT_LIMIT",
                value,
            }
        })?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            upstream,
            views: ViewConfig {
                page_size: page_size as usize,
                recent_limit: recent_limit as usize,
            },
        })
    }
}

fn positive_var(name: &str, default: u64) -> Result<u64, String> {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(raw),
        },
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location of the remote job/application store.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl UpstreamConfig {
    /// Validates the scheme and strips trailing slashes so paths can be appended verbatim.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, ConfigError> {
        let raw = base_url.into();
        let trimmed = raw.trim().trim_end_matches('/');
        let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
        let has_host = trimmed
            .split_once("://")
            .map(|(_, rest)| !rest.is_empty())
            .unwrap_or(false);
        if !has_scheme || !has_host {
            return Err(ConfigError::InvalidUpstreamUrl { value: raw });
        }

        Ok(Self {
            base_url: trimmed.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Defaults applied to list views when a request leaves them unset.
#[derive(Debug, Clone, Copy)]
pub struct ViewConfig {
    pub page_size: usize,
    pub recent_limit: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            recent_limit: 2,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidUpstreamUrl { value: String },
    InvalidNumber { variable: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidUpstreamUrl { value } => {
                write!(f, "APP_UPSTREAM_URL must be an http(s) URL, got '{value}'")
            }
            ConfigError::InvalidNumber { variable, value } => {
                write!(f, "{variable} must be a positive integer, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidUpstreamUrl { .. }
            | ConfigError::InvalidNumber { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_UPSTREAM_URL");
        env::remove_var("APP_UPSTREAM_TIMEOUT_SECS");
        env::remove_var("APP_PAGE_SIZE");
        env::remove_var("APP_RECENT_LIMIT");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.upstream.base_url, "http://127.0.0.1:8080/api");
        assert_eq!(config.upstream.timeout, Duration::from_secs(15));
        assert_eq!(config.views.page_size, 10);
        assert_eq!(config.views.recent_limit, 2);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn rejects_zero_page_size() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PAGE_SIZE", "0");
        match AppConfig::load() {
            Err(ConfigError::InvalidNumber { variable, value }) => {
                assert_eq!(variable, "APP_PAGE_SIZE");
                assert_eq!(value, "0");
            }
            other => panic!("expected invalid page size, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn upstream_url_is_normalized() {
        let upstream = UpstreamConfig::new("https://jobs.example.com/api/", 5).expect("valid url");
        assert_eq!(upstream.base_url, "https://jobs.example.com/api");

        assert!(matches!(
            UpstreamConfig::new("jobs.example.com", 5),
            Err(ConfigError::InvalidUpstreamUrl { .. })
        ));
        assert!(matches!(
            UpstreamConfig::new("http://", 5),
            Err(ConfigError::InvalidUpstreamUrl { .. })
        ));
    }
}
