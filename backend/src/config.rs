//! Configuration management for the Tangyuling API
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with TANGYULING_ prefix
//!
//! The KHOA service key and the model path are optional at startup; the
//! first request that needs them fails with a configuration error instead.

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// KHOA open API configuration
    pub khoa: KhoaConfig,

    /// Regression model configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Daily beach collection
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KhoaConfig {
    /// Service key issued by the KHOA open data portal
    pub api_key: Option<String>,

    /// Tidal current area search endpoint
    pub current_endpoint: String,

    /// Recent tide station observation endpoint (wind)
    pub wind_endpoint: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ModelConfig {
    /// Path to the serialized regression model
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,

    /// Local (KST) hour of the daily run
    pub hour: u32,

    /// Local (KST) minute of the daily run
    pub minute: u32,

    /// Upper bound for one collection run in seconds
    pub timeout_secs: u64,
}

pub const DEFAULT_CURRENT_ENDPOINT: &str =
    "http://www.khoa.go.kr/api/oceangrid/tidalCurrentArea/search.do";
pub const DEFAULT_WIND_ENDPOINT: &str =
    "http://www.khoa.go.kr/api/oceangrid/tideObsRecent/search.do";

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("TANGYULING_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let mut builder = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("khoa.current_endpoint", DEFAULT_CURRENT_ENDPOINT)?
            .set_default("khoa.wind_endpoint", DEFAULT_WIND_ENDPOINT)?
            .set_default("khoa.timeout_secs", 10)?
            .set_default("scheduler.enabled", true)?
            .set_default("scheduler.hour", 6)?
            .set_default("scheduler.minute", 0)?
            .set_default("scheduler.timeout_secs", 3600)?;

        // Unprefixed API_KEY / MODEL_PATH from older .env files act as defaults
        if let Ok(api_key) = std::env::var("API_KEY") {
            builder = builder.set_default("khoa.api_key", api_key)?;
        }
        if let Ok(model_path) = std::env::var("MODEL_PATH") {
            builder = builder.set_default("model.path", model_path)?;
        }

        let config = builder
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (TANGYULING_ prefix)
            .add_source(
                Environment::with_prefix("TANGYULING")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for KhoaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            current_endpoint: DEFAULT_CURRENT_ENDPOINT.to_string(),
            wind_endpoint: DEFAULT_WIND_ENDPOINT.to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hour: 6,
            minute: 0,
            timeout_secs: 3600,
        }
    }
}

