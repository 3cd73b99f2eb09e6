//! Configuration management for the catalog pipeline

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::colors::ColorCutoffs;

/// Main configuration structure for the catalog pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Outbound HTTP settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Logo color extraction thresholds
    #[serde(default)]
    pub colors: ColorCutoffs,
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds, applied to every upstream and logo fetch
    pub request_timeout_seconds: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 5,
            user_agent: format!("superchain-catalog/{}", crate::VERSION),
        }
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl CatalogConfig {
    /// Load configuration from `config/` files and `CATALOG`-prefixed environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config/default")
    }

    /// Load configuration layered on top of an explicit base file
    pub fn load_from(base: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .add_source(File::with_name(base).required(false))
            // Add environment-specific config
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("CATALOG").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.request_timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "http.request_timeout_seconds must be greater than 0".into(),
            ));
        }

        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("http.user_agent cannot be empty".into()));
        }

        if self.colors.dark_cutoff > self.colors.light_cutoff {
            return Err(ConfigError::Message(format!(
                "colors.dark_cutoff ({}) must not exceed colors.light_cutoff ({})",
                self.colors.dark_cutoff, self.colors.light_cutoff
            )));
        }

        Ok(())
    }
}
