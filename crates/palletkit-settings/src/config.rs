//! Planner configuration management
//!
//! Aggregates the strategy choice and the parameters of both strategies, and
//! provides file I/O in JSON or TOML (chosen by file extension).

use crate::error::{SettingsError, SettingsResult};
use palletkit_planner::{GridParameters, OptimizerParameters, PathStrategy, StrategyKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory name under the platform config directory
pub const CONFIG_DIR_NAME: &str = "palletkit";

/// File name of the default configuration
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// On-disk format of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Format implied by the extension of `path`
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(ConfigFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(ConfigFormat::Toml),
            other => Err(SettingsError::UnsupportedFormat(format!(
                "config file must be .json or .toml, got {}",
                other.unwrap_or("no extension")
            ))),
        }
    }
}

/// Complete planner configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Strategy used when none is requested explicitly
    pub strategy: StrategyKind,
    /// Optimized strategy parameters
    pub optimizer: OptimizerParameters,
    /// Standard strategy parameters
    pub grid: GridParameters,
}

impl Config {
    /// Default configuration file location
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".to_string())
        })?;
        Ok(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded planner config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        info!("Saved planner config to {}", path.display());
        Ok(())
    }

    /// Load `path` if given, else the default file if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Ok(default) if default.is_file() => Self::load_from_file(&default),
            _ => {
                debug!("No planner config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.optimizer.validate()?;
        self.grid.validate()?;
        Ok(())
    }

    /// Build the strategy `kind`, or the configured one
    pub fn strategy(&self, kind: Option<StrategyKind>) -> Box<dyn PathStrategy> {
        kind.unwrap_or(self.strategy)
            .build(&self.optimizer, &self.grid)
    }
}
