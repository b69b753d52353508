//! Table configuration module.
//!
//! This module defines how textual routes are turned into tree paths and
//! which lookup the front end performs by default.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Lookup performed against the route tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// Only the node at exactly the requested path answers
    Exact,
    /// The deepest valued node along the requested path answers
    #[default]
    Longest,
}

/// Route table configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Separator between path segments in textual routes
    pub separator: String,

    /// Lookup performed when none is requested explicitly
    pub default_mode: LookupMode,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            separator: "/".to_string(),
            default_mode: LookupMode::default(),
        }
    }
}

impl Validate for TableConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.separator.is_empty() {
            return Err(ConfigError::ValidationError(
                "separator cannot be empty".to_string(),
            ));
        }

        if self.separator.chars().any(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "separator cannot contain whitespace: {:?}",
                self.separator
            )));
        }

        Ok(())
    }
}
