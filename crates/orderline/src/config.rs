//! Application configuration.
//!
//! Loaded from a TOML file; every field has a default so an empty file (or no file)
//! yields a working setup.
//!
//! ```toml
//! [pricing]
//! delivery_fee = 3.99
//! currency = "usd"
//!
//! [kitchen]
//! prep_minutes = 45
//! ```

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "ORDERLINE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pricing: PricingConfig,
    pub kitchen: KitchenConfig,
    pub actors: ActorConfig,
    pub hours: HoursConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Flat fee added to delivery orders; pickup pays nothing.
    pub delivery_fee: f64,
    pub currency: String,
    /// Points earned per currency unit spent.
    pub points_per_currency_unit: u32,
    /// Points that make up one currency unit of discount.
    pub points_per_discount_unit: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            delivery_fee: 3.99,
            currency: "usd".to_string(),
            points_per_currency_unit: 10,
            points_per_discount_unit: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KitchenConfig {
    pub prep_minutes: u32,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self { prep_minutes: 45 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub buffer_size: usize,
    pub feed_capacity: usize,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            buffer_size: 32,
            feed_capacity: 256,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HoursConfig {
    pub cache_ttl_secs: u64,
}

impl Default for HoursConfig {
    fn default() -> Self {
        Self { cache_ttl_secs: 60 }
    }
}

impl HoursConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `.env`, then the file named by `ORDERLINE_CONFIG`, falling back to defaults
    /// when the variable is unset.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(path),
            Err(_) => {
                tracing::debug!("{CONFIG_ENV} not set, using default configuration");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!(?path, "Loading configuration");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.pricing.delivery_fee.is_finite() || self.pricing.delivery_fee < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "pricing.delivery_fee must be a non-negative number, got {}",
                self.pricing.delivery_fee
            )));
        }
        if self.pricing.points_per_discount_unit == 0 {
            return Err(ConfigError::Invalid(
                "pricing.points_per_discount_unit must be positive".to_string(),
            ));
        }
        if self.actors.buffer_size == 0 || self.actors.feed_capacity == 0 {
            return Err(ConfigError::Invalid(
                "actors.buffer_size and actors.feed_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.pricing.delivery_fee, 3.99);
        assert_eq!(config.pricing.currency, "usd");
        assert_eq!(config.kitchen.prep_minutes, 45);
        assert_eq!(config.hours.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.actors.buffer_size, 32);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [pricing]
            delivery_fee = 4.5

            [server]
            listen_addr = "0.0.0.0:8080"
            "#,
        )
        .unwrap();
        assert_eq!(config.pricing.delivery_fee, 4.5);
        assert_eq!(config.pricing.points_per_currency_unit, 10);
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = AppConfig::from_toml("[pricing]\ndelivery_fee = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = AppConfig::from_toml("[pricing]\ndelivery_fee = \"free\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = AppConfig::from_file("/nonexistent/orderline.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/orderline.toml"));
    }
}
