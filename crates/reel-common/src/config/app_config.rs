//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use tracing::Level;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub dashboard: DashboardConfig,
    pub telemetry: TelemetryConfig,
    pub seed: SeedConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Derived view settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardConfig {
    /// Title shown for a submission whose campaign cannot be found
    #[serde(default = "default_unresolved_campaign_label")]
    pub unresolved_campaign_label: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            unresolved_campaign_label: default_unresolved_campaign_label(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl TelemetryConfig {
    /// Parsed level; the value was checked when the config was loaded
    #[must_use]
    pub fn level(&self) -> Level {
        self.level.parse().unwrap_or(Level::INFO)
    }
}

/// Console runner seed data
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    /// JSON file with the initial collections
    #[serde(default)]
    pub path: Option<String>,
}

// Default value functions
fn default_app_name() -> String {
    "reel".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_unresolved_campaign_label() -> String {
    "Campaign".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable holds a value that cannot be used
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = match lookup("APP_ENV") {
            Some(s) => Environment::parse(&s).ok_or(ConfigError::InvalidValue("APP_ENV", s))?,
            None => default_env(),
        };

        let level = lookup("LOG_LEVEL").unwrap_or_else(default_log_level);
        if level.parse::<Level>().is_err() {
            return Err(ConfigError::InvalidValue("LOG_LEVEL", level));
        }

        let format = match lookup("LOG_FORMAT").as_deref().map(str::to_lowercase) {
            None => {
                if env.is_production() {
                    LogFormat::Json
                } else {
                    LogFormat::Pretty
                }
            }
            Some(s) if s == "json" => LogFormat::Json,
            Some(s) if s == "pretty" => LogFormat::Pretty,
            Some(s) => return Err(ConfigError::InvalidValue("LOG_FORMAT", s)),
        };

        let unresolved_campaign_label = lookup("DASHBOARD_UNRESOLVED_CAMPAIGN_LABEL")
            .unwrap_or_else(default_unresolved_campaign_label);
        if unresolved_campaign_label.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "DASHBOARD_UNRESOLVED_CAMPAIGN_LABEL",
                unresolved_campaign_label,
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            dashboard: DashboardConfig {
                unresolved_campaign_label,
            },
            telemetry: TelemetryConfig { level, format },
            seed: SeedConfig {
                path: lookup("SEED_FILE").filter(|s| !s.trim().is_empty()),
            },
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: default_env(),
            },
            dashboard: DashboardConfig::default(),
            telemetry: TelemetryConfig {
                level: default_log_level(),
                format: LogFormat::default(),
            },
            seed: SeedConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
