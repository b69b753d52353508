//! Configuration module for Oak.
//!
//! This module loads settings from files (TOML, JSON) and overrides them with
//! environment variables. All configuration values are validated for
//! correctness before use.

use std::path::{Path, PathBuf};

use crate::error::config::ConfigError;
use crate::tree::split_path;
use config::{Config, ConfigError as ExternalConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

pub mod table;

pub use table::{LookupMode, TableConfig};

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Default environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "OAK";

/// A trait for types that can be validated.
pub trait Validate {
    /// Validates that the configuration is correct.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the configuration is valid
    /// * `Err(ConfigError)` if the configuration is invalid
    fn validate(&self) -> ConfigResult<()>;
}

/// Main configuration for Oak.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OakConfig {
    /// Route table configuration
    pub table: TableConfig,

    /// Log configuration
    pub log: LogConfig,

    /// Routes loaded into the table at startup
    pub routes: Vec<RouteEntry>,
}

impl Validate for OakConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.table.validate()?;
        self.log.validate()?;

        for route in &self.routes {
            route.validate()?;
            split_path(&route.path, &self.table.separator).map_err(|e| {
                ConfigError::ValidationError(format!("Invalid route '{}': {e}", route.path))
            })?;
        }

        Ok(())
    }
}

/// A single route: a textual path and the target it resolves to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteEntry {
    /// Textual path, split on the table separator
    pub path: String,

    /// Value stored at the path
    pub target: String,
}

impl RouteEntry {
    /// Creates a new route entry.
    pub fn new<P: Into<String>, T: Into<String>>(path: P, target: T) -> Self {
        Self {
            path: path.into(),
            target: target.into(),
        }
    }
}

impl Validate for RouteEntry {
    fn validate(&self) -> ConfigResult<()> {
        if self.target.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "Route '{}' has an empty target",
                self.path
            )));
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Whether to log in JSON format
    pub json: bool,

    /// Whether to include source code locations in logs
    pub source_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            source_location: true,
        }
    }
}

impl Validate for LogConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}",
                self.level
            ))),
        }
    }
}

/// Configuration loader for Oak.
#[derive(Debug)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Optional path to the configuration file
    /// * `env_prefix` - Prefix for environment variables that override configuration values
    pub fn new<P: AsRef<Path>>(config_path: Option<P>, env_prefix: &str) -> Self {
        Self {
            config_path: config_path.map(|p| p.as_ref().to_path_buf()),
            env_prefix: env_prefix.to_string(),
        }
    }

    /// Loads the configuration from defaults, a file and environment variables,
    /// in increasing order of precedence.
    ///
    /// # Returns
    ///
    /// * `Ok(OakConfig)` if the configuration was loaded and validated
    /// * `Err(ConfigError)` if there was an error loading the configuration
    pub fn load(&self) -> ConfigResult<OakConfig> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&OakConfig::default())
                .map_err(|e| ConfigError::ParseError(e.to_string()))?,
        );

        if let Some(path) = &self.config_path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }

            let format = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => FileFormat::Toml,
                Some("json") => FileFormat::Json,
                _ => {
                    return Err(ConfigError::ParseError(format!(
                        "Unsupported file extension for: {path:?}"
                    )))
                }
            };
            builder = builder.add_source(File::from(path.as_path()).format(format));
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(|e| match e {
            ExternalConfigError::NotFound(path) => ConfigError::FileNotFound(PathBuf::from(path)),
            other => ConfigError::ParseError(other.to_string()),
        })?;

        let oak_config: OakConfig = config
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        oak_config.validate()?;

        tracing::debug!(
            routes = oak_config.routes.len(),
            separator = %oak_config.table.separator,
            "Configuration loaded"
        );

        Ok(oak_config)
    }
}
