//! Configuration management for the Equipment Registry service
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server host
    pub host: String,

    /// API server port
    pub port: u16,

    /// Redis connection URL; the service keeps state in memory only when unset
    pub redis_url: Option<String>,

    /// Request header carrying the caller principal
    pub caller_header: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config {
            host: lookup("REGISTRY_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("REGISTRY_PORT")
                .unwrap_or_else(|| "8083".to_string())
                .parse()
                .context("Invalid REGISTRY_PORT")?,

            redis_url: lookup("REDIS_URL").filter(|url| !url.is_empty()),

            caller_header: lookup("CALLER_HEADER")
                .unwrap_or_else(|| "x-caller-principal".to_string())
                .to_ascii_lowercase(),
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("REGISTRY_PORT must be greater than 0");
        }

        if axum::http::HeaderName::from_bytes(self.caller_header.as_bytes()).is_err() {
            anyhow::bail!("CALLER_HEADER is not a valid header name: {:?}", self.caller_header);
        }

        Ok(())
    }

    /// Get the API server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = config_from(&[]).expect("Failed to load config");

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8083);
        assert!(config.redis_url.is_none());
        assert_eq!(config.caller_header, "x-caller-principal");
    }

    #[test]
    fn test_config_overrides() {
        let config = config_from(&[
            ("REGISTRY_HOST", "127.0.0.1"),
            ("REGISTRY_PORT", "9000"),
            ("REDIS_URL", "redis://cache:6379"),
            ("CALLER_HEADER", "X-Tx-Sender"),
        ])
        .unwrap();

        assert_eq!(config.address(), "127.0.0.1:9000");
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.caller_header, "x-tx-sender");
    }

    #[test]
    fn test_empty_redis_url_means_memory_only() {
        let config = config_from(&[("REDIS_URL", "")]).unwrap();
        assert!(config.redis_url.is_none());
    }

    #[test]
    fn test_validate_invalid_port() {
        let result = config_from(&[("REGISTRY_PORT", "0")]);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("REGISTRY_PORT must be greater than 0"));

        assert!(config_from(&[("REGISTRY_PORT", "http")]).is_err());
    }

    #[test]
    fn test_validate_invalid_header() {
        assert!(config_from(&[("CALLER_HEADER", "")]).is_err());
        assert!(config_from(&[("CALLER_HEADER", "bad header")]).is_err());
    }
}
