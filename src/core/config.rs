//! Configuration management

use crate::core::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub resolution: ResolutionConfig,
    pub statistics: StatisticsConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Resolve providers in parallel
    pub parallel: bool,
    /// Worker threads for provider resolution (0 = rayon default)
    pub threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// Data type counted for atomic tags that don't declare one
    pub default_data_type: String,
    /// Value source counted for atomic tags that don't declare one
    pub default_value_source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Include the `_types_` folder in exports
    pub include_types: bool,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: 0,
        }
    }
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            default_data_type: DEFAULT_DATA_TYPE.to_string(),
            default_value_source: DEFAULT_VALUE_SOURCE.to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_types: true,
        }
    }
}

impl Config {
    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = Self::tagtree_home()?;
        Ok(home.join("config.toml"))
    }

    /// Get the tagtree home directory
    pub fn tagtree_home() -> Result<PathBuf> {
        // Check TAGTREE_HOME env var first
        if let Ok(home) = std::env::var("TAGTREE_HOME") {
            return Ok(PathBuf::from(home));
        }

        ProjectDirs::from("dev", "tagtree", "tagtree")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| Error::ConfigError {
                message: "Could not determine tagtree home directory".to_string(),
            })
    }
}

pub const DEFAULT_DATA_TYPE: &str = "Int4";
pub const DEFAULT_VALUE_SOURCE: &str = "memory";
