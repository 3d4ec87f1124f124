//! Configuration management for streamgate
//!
//! This module provides environment-based configuration management with
//! support for defaults, TOML files and validation.

use crate::policy::PolicyOptions;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

mod error;

pub use error::ConfigError;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Policy configuration
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Policy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Only members may view private and hidden space streams
    pub restrict_space_views: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include timestamps
    pub with_timestamp: bool,

    /// Include target module
    pub with_target: bool,
}

/// Metrics configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Register metric descriptions at startup
    pub enabled: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let options = PolicyOptions::default();
        Self {
            restrict_space_views: options.restrict_space_views,
        }
    }
}

impl PolicyConfig {
    /// Evaluator options described by this section
    pub fn options(&self) -> PolicyOptions {
        PolicyOptions {
            restrict_space_views: self.restrict_space_views,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamp: true,
            with_target: true,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    value.parse().map_err(|e: std::str::ParseBoolError| ConfigError::InvalidValue {
        var,
        reason: e.to_string(),
    })
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables follow the pattern: STREAMGATE_<SECTION>_<KEY>
    /// Example: STREAMGATE_POLICY_RESTRICT_SPACE_VIEWS=false
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay environment variables onto this configuration
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        // Policy config
        if let Ok(restrict) = env::var("STREAMGATE_POLICY_RESTRICT_SPACE_VIEWS") {
            self.policy.restrict_space_views =
                parse_flag("STREAMGATE_POLICY_RESTRICT_SPACE_VIEWS", &restrict)?;
        }

        // Logging config
        if let Ok(level) = env::var("STREAMGATE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(json) = env::var("STREAMGATE_LOG_JSON") {
            self.logging.json_format = parse_flag("STREAMGATE_LOG_JSON", &json)?;
        }

        // Metrics config
        if let Ok(enabled) = env::var("STREAMGATE_METRICS_ENABLED") {
            self.metrics.enabled = parse_flag("STREAMGATE_METRICS_ENABLED", &enabled)?;
        }

        Ok(())
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&contents)?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)?;

        std::fs::write(path, contents).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }
}
