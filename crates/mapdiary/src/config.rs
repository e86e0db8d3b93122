//! Configuration management for mapdiary.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::{Coordinate, Region, Span};
use crate::viewport::{ViewportSettings, DEFAULT_DEBOUNCE_MS};
use crate::zoom::ClusterRadii;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "mapdiary";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `MAPDIARY_`)
/// 2. TOML config file at `~/.config/mapdiary/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Viewport configuration.
    pub viewport: ViewportConfig,
    /// Clustering radii.
    pub clustering: ClusterRadii,
    /// Entry source configuration.
    pub entries: EntriesConfig,
}

/// Viewport-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Quiet period after the last region change, in milliseconds.
    pub debounce_ms: u64,
    /// Latitude of the initial map center.
    pub initial_latitude: f64,
    /// Longitude of the initial map center.
    pub initial_longitude: f64,
    /// Initial latitude span in degrees.
    pub initial_latitude_delta: f64,
    /// Initial longitude span in degrees.
    pub initial_longitude_delta: f64,
}

/// Where diary entries come from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntriesConfig {
    /// JSON file of entries. The built-in sample trips are used when unset.
    pub path: Option<PathBuf>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            initial_latitude: 30.0,
            initial_longitude: 120.0,
            initial_latitude_delta: 180.0,
            initial_longitude_delta: 180.0,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `MAPDIARY_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("MAPDIARY_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.viewport.debounce_ms == 0 {
            return Err(Error::config_validation(
                "debounce_ms must be greater than 0",
            ));
        }

        self.clustering
            .check()
            .map_err(|message| Error::config_validation(format!("clustering: {message}")))?;

        self.initial_region()
            .map_err(|e| Error::config_validation(format!("initial region: {e}")))?;

        Ok(())
    }

    /// Get the debounce period as a Duration.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.viewport.debounce_ms)
    }

    /// The configured starting region.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured center or span is invalid.
    pub fn initial_region(&self) -> Result<Region> {
        let v = &self.viewport;
        Ok(Region::new(
            Coordinate::new(v.initial_latitude, v.initial_longitude)?,
            Span::new(v.initial_latitude_delta, v.initial_longitude_delta)?,
        ))
    }

    /// Settings for spawning a [`crate::MapViewport`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured initial region is invalid.
    pub fn viewport_settings(&self) -> Result<ViewportSettings> {
        Ok(ViewportSettings {
            debounce: self.debounce(),
            initial_region: self.initial_region()?,
        })
    }
}
