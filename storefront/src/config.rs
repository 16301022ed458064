//! Storefront configuration (`storefront.toml`)
//!
//! ```toml
//! [backend]
//! url = "https://shop.example.com"
//! api_key_env = "STOREFRONT_API_KEY"
//!
//! [carousel]
//! period_ms = 5000
//!
//! [effects]
//! concurrency = "latest"
//!
//! [logging]
//! exclude = ["LoadFooter*"]
//!
//! [pricing]
//! currency = "EUR"
//! default_price = 100.0
//! shipping_baseline = 9.99
//!
//! [pricing.categories]
//! seasonal = 150.0
//!
//! [translations]
//! "store.name" = "Fjellbu"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use storefront_dispatch::{ActionLoggerConfig, Concurrency, PriceTable};
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    pub backend: BackendConfig,
    pub carousel: CarouselConfig,
    pub effects: EffectsConfig,
    pub logging: ActionLoggerConfig,
    pub pricing: PricingConfig,
    pub translations: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the REST backend; `None` runs on the demo catalogue
    pub url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key_env: "STOREFRONT_API_KEY".to_string(),
        }
    }
}

impl BackendConfig {
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub period_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self { period_ms: 5000 }
    }
}

impl CarouselConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub concurrency: Concurrency,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// ISO 4217 code used in structured data
    pub currency: String,
    #[serde(flatten)]
    pub table: PriceTable,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            table: PriceTable::default(),
        }
    }
}

impl StorefrontConfig {
    /// Loads configuration from `path`, parses it as TOML and validates it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: StorefrontConfig = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The carousel period is positive
    /// - Every price is finite and non-negative
    /// - The backend URL, if set, is an http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.carousel.period_ms == 0 {
            return Err(ConfigError::ValidationError {
                message: "carousel.period_ms must be greater than 0".to_string(),
            });
        }

        let table = &self.pricing.table;
        let prices = table
            .categories
            .iter()
            .map(|(tag, price)| (format!("pricing.categories.{tag}"), *price))
            .chain([
                ("pricing.default_price".to_string(), table.default_price),
                ("pricing.shipping_baseline".to_string(), table.shipping_baseline),
            ]);
        for (key, price) in prices {
            if !price.is_finite() || price < 0.0 {
                return Err(ConfigError::ValidationError {
                    message: format!("{key} must be a non-negative number, got {price}"),
                });
            }
        }

        if let Some(url) = &self.backend.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationError {
                    message: format!("backend.url '{url}' must start with http:// or https://"),
                });
            }
        }

        Ok(())
    }
}
