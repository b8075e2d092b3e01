use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CSV_PATH: &str = "Trump Obesity Data - Sheet1.csv";
pub const DEFAULT_TOPOLOGY_PATH: &str = "states-albers-10m.json";
pub const DEFAULT_OBJECT: &str = "states";
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(750);

/// Distinguishes runtime behavior for different stages of the tool.
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
    pub sources: SourceConfig,
    pub chart: ChartConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let csv_path = env::var("STATEMAP_CSV").unwrap_or_else(|_| DEFAULT_CSV_PATH.to_string());
        let topology_path =
            env::var("STATEMAP_TOPOLOGY").unwrap_or_else(|_| DEFAULT_TOPOLOGY_PATH.to_string());
        let object = env::var("STATEMAP_OBJECT").unwrap_or_else(|_| DEFAULT_OBJECT.to_string());
        if object.trim().is_empty() {
            return Err(ConfigError::EmptyObjectName);
        }

        let transition = match env::var("STATEMAP_TRANSITION_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidTransition { value: raw })?,
            Err(_) => DEFAULT_TRANSITION,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            sources: SourceConfig {
                csv_path: PathBuf::from(csv_path),
                topology_path: PathBuf::from(topology_path),
                object: object.trim().to_string(),
            },
            chart: ChartConfig { transition },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Locations of the two input files and the topology object holding the regions.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub csv_path: PathBuf,
    pub topology_path: PathBuf,
    pub object: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            topology_path: PathBuf::from(DEFAULT_TOPOLOGY_PATH),
            object: DEFAULT_OBJECT.to_string(),
        }
    }
}

/// Rendering controls.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub transition: Duration,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            transition: DEFAULT_TRANSITION,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTransition { value: String },
    EmptyObjectName,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTransition { value } => write!(
                f,
                "STATEMAP_TRANSITION_MS must be a whole number of milliseconds, got '{value}'"
            ),
            ConfigError::EmptyObjectName => write!(f, "STATEMAP_OBJECT must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}
