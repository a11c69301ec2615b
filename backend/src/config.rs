//! Configuration management for the flood risk prediction service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with FLOOD_ prefix

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::ScoringModel;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production, test)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Log output configuration
    pub logging: LoggingConfig,

    /// Geocoding API configuration
    pub geocoding: ProviderConfig,

    /// Weather API configuration
    pub weather: ProviderConfig,

    /// Flood risk scoring model; any field left out keeps its default
    #[serde(default)]
    pub scoring: ScoringModel,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

/// Settings for an external HTTP API
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// API base URL; the client's public endpoint is used when absent
    pub api_endpoint: Option<String>,

    /// API key
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("FLOOD_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("logging.format", "pretty")?
            .set_default("geocoding.api_key", "")?
            .set_default("geocoding.timeout_secs", 10)?
            .set_default("weather.api_key", "")?
            .set_default("weather.timeout_secs", 10)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FLOOD_ prefix)
            .add_source(
                Environment::with_prefix("FLOOD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring
            .validate()
            .map_err(|e| ConfigError::Message(format!("invalid scoring model: {}", e)))?;

        if self.environment != "test" {
            if self.geocoding.api_key.trim().is_empty() {
                return Err(ConfigError::Message(
                    "geocoding.api_key is required (set FLOOD__GEOCODING__API_KEY)".into(),
                ));
            }
            if self.weather.api_key.trim().is_empty() {
                return Err(ConfigError::Message(
                    "weather.api_key is required (set FLOOD__WEATHER__API_KEY)".into(),
                ));
            }
        }

        for (name, provider) in [("geocoding", &self.geocoding), ("weather", &self.weather)] {
            if provider.timeout_secs == 0 {
                return Err(ConfigError::Message(format!(
                    "{}.timeout_secs must be greater than zero",
                    name
                )));
            }
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
        }
    }
}
