//! Configuration management for foodorder.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name under the user's config dir.
const APP_DIR_NAME: &str = "foodorder";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FOODORDER_`, sections split on `__`)
/// 2. TOML config file at `~/.config/foodorder/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// CSV export configuration.
    pub export: ExportConfig,
    /// Display configuration.
    pub display: DisplayConfig,
}

/// Where the menu and order documents live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding both documents, relative to the working directory
    /// unless absolute.
    pub data_dir: PathBuf,
    /// File name of the menu document.
    pub menu_file: String,
    /// File name of the orders document.
    pub orders_file: String,
}

/// CSV export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Destination of the orders export.
    pub path: PathBuf,
}

/// Display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Prefix printed before every amount.
    pub currency: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            menu_file: "menu.json".to_string(),
            orders_file: "orders.json".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("orders_export.csv"),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: "Rs".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A config file that doesn't exist is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FOODORDER_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.menu_file.trim().is_empty() || self.storage.orders_file.trim().is_empty()
        {
            return Err(Error::ConfigValidation {
                message: "menu_file and orders_file must not be empty".to_string(),
            });
        }

        if self.storage.menu_file == self.storage.orders_file {
            return Err(Error::ConfigValidation {
                message: format!(
                    "menu_file and orders_file must differ (both are {:?})",
                    self.storage.menu_file
                ),
            });
        }

        if self.display.currency.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "currency must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Path of the menu document.
    #[must_use]
    pub fn menu_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.menu_file)
    }

    /// Path of the orders document.
    #[must_use]
    pub fn orders_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.orders_file)
    }
}
