use crate::planning::{Country, Workweek};
use crate::procurement::DEFAULT_RISK_WINDOW_DAYS;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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
    pub planner: PlannerConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            planner: PlannerConfig::from_env()?,
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

/// Calendar and risk defaults for scheduling runs.
///
/// Construction activities use `construction_workweek`; procurement
/// arithmetic uses `admin_workweek`. Both share the country's holidays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    pub country: Country,
    pub construction_workweek: Workweek,
    pub admin_workweek: Workweek,
    pub risk_window_days: i64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            country: Country::default(),
            construction_workweek: Workweek::FiveDay,
            admin_workweek: Workweek::FiveDay,
            risk_window_days: DEFAULT_RISK_WINDOW_DAYS,
        }
    }
}

impl PlannerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let country = env::var("RFS_COUNTRY")
            .map(|code| Country::from_code(&code))
            .unwrap_or(defaults.country);
        let construction_workweek = workweek_var("RFS_CONSTRUCTION_WORKWEEK")?
            .unwrap_or(defaults.construction_workweek);
        let admin_workweek =
            workweek_var("RFS_ADMIN_WORKWEEK")?.unwrap_or(defaults.admin_workweek);
        let risk_window_days = match env::var("RFS_RISK_WINDOW_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|days| *days >= 0)
                .ok_or(ConfigError::InvalidRiskWindow { value: raw })?,
            Err(_) => defaults.risk_window_days,
        };

        Ok(Self {
            country,
            construction_workweek,
            admin_workweek,
            risk_window_days,
        })
    }
}

fn workweek_var(name: &'static str) -> Result<Option<Workweek>, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u8>()
        .ok()
        .and_then(Workweek::from_length)
        .map(Some)
        .ok_or(ConfigError::InvalidWorkweek { name, value: raw })
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWorkweek { name: &'static str, value: String },
    InvalidRiskWindow { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWorkweek { name, value } => {
                write!(f, "{name} must be 5 or 6, got '{value}'")
            }
            ConfigError::InvalidRiskWindow { value } => write!(
                f,
                "RFS_RISK_WINDOW_DAYS must be a non-negative integer, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidWorkweek { .. }
            | ConfigError::InvalidRiskWindow { .. } => None,
        }
    }
}
