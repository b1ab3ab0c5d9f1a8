use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::workflows::screening::DeliveryMode;

pub const DEFAULT_JOB_PORTAL_BASE_URL: &str = "https://api.examplejobportal.com";
pub const DEFAULT_HR_SOFTWARE_BASE_URL: &str = "https://api.examplehrsoftware.com";
pub const DEFAULT_RESUME_PATH: &str = "resumes/";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

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

/// Top-level configuration for both pipelines and the HTTP service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub portal: PortalConfig,
    pub hr: HrConfig,
    pub resumes: ResumeConfig,
    pub http: HttpConfig,
}

impl AppConfig {
    /// Load `.env` (if present) and read settings from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let environment =
            AppEnvironment::from_str(&read("APP_ENV").unwrap_or_else(|| "development".to_string()));

        let host = read("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = read("APP_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = read("APP_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let portal = PortalConfig {
            base_url: read("JOB_PORTAL_BASE_URL")
                .unwrap_or_else(|| DEFAULT_JOB_PORTAL_BASE_URL.to_string()),
            api_key: read("JOB_PORTAL_API_KEY"),
        };

        let delivery_mode = match read("HR_DELIVERY_MODE") {
            Some(raw) => DeliveryMode::parse(&raw).ok_or(ConfigError::InvalidDeliveryMode(raw))?,
            None => DeliveryMode::default(),
        };

        let hr = HrConfig {
            base_url: read("HR_SOFTWARE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_HR_SOFTWARE_BASE_URL.to_string()),
            api_key: read("HR_SOFTWARE_API_KEY"),
            delivery_mode,
        };

        let resumes = ResumeConfig {
            directory: PathBuf::from(
                read("RESUME_PATH").unwrap_or_else(|| DEFAULT_RESUME_PATH.to_string()),
            ),
        };

        let timeout_secs = match read("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            portal,
            hr,
            resumes,
            http: HttpConfig {
                timeout: Duration::from_secs(timeout_secs),
            },
        })
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Job portal endpoint and credentials.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl PortalConfig {
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or(ConfigError::Missing("JOB_PORTAL_API_KEY"))
    }
}

/// HR system endpoint, credentials, and how notifications are grouped.
#[derive(Debug, Clone)]
pub struct HrConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub delivery_mode: DeliveryMode,
}

impl HrConfig {
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or(ConfigError::Missing("HR_SOFTWARE_API_KEY"))
    }
}

/// Location of the résumé text files.
#[derive(Debug, Clone)]
pub struct ResumeConfig {
    pub directory: PathBuf,
}

/// Outbound HTTP limits shared by the portal and HR clients.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout(String),
    InvalidDeliveryMode(String),
    Missing(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout(value) => write!(
                f,
                "HTTP_TIMEOUT_SECS must be a positive number of seconds, got '{value}'"
            ),
            ConfigError::InvalidDeliveryMode(value) => write!(
                f,
                "HR_DELIVERY_MODE must be 'batch' or 'individual', got '{value}'"
            ),
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
