//! Configuration for the API server

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use superchain_catalog::CatalogConfig;

/// API server configuration; embeds the pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, e.g. `0.0.0.0:3000`
    pub bind_address: String,

    /// How long a generated catalog is served before regenerating. 0 disables caching.
    pub cache_ttl_seconds: u64,

    /// Send permissive CORS headers
    pub allow_any_origin: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            cache_ttl_seconds: 0,
            allow_any_origin: true,
        }
    }
}

impl ServerConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

impl ApiConfig {
    /// Load from `config/` files and `SUPERCHAIN_API`-prefixed environment variables
    pub fn load_from(base: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(base).required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("SUPERCHAIN_API").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.bind_address.parse::<SocketAddr>().map_err(|_| {
            ConfigError::Message(format!(
                "Invalid server.bind_address: {}",
                self.server.bind_address
            ))
        })?;

        self.catalog.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.cache_ttl(), Duration::ZERO);
    }

    #[test]
    fn test_rejects_bad_bind_address() {
        let mut config = ApiConfig::default();
        config.server.bind_address = "localhost".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: ApiConfig = serde_json::from_str(
            r#"{
                "server": { "cache_ttl_seconds": 600 },
                "catalog": { "http": { "request_timeout_seconds": 3 } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.server.cache_ttl_seconds, 600);
        assert_eq!(config.server.bind_address, "0.0.0.0:3000");
        assert_eq!(config.catalog.http.request_timeout_seconds, 3);
    }
}
