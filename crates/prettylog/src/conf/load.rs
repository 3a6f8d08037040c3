//! Load: config file discovery and TOML parsing.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::model::Config;

pub const CONFIG_FILE_ENV: &str = "PRETTYLOG_CONFIG_FILE";
const CONFIG_DIR_NAME: &str = "prettylog";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line or through the environment; must exist
    Explicit(PathBuf),
    /// The per-user default location; may be absent
    Default(PathBuf),
    /// No config directory on this platform
    None,
}

impl ConfigSource {
    /// Priority: flag > environment variable > user config dir
    pub fn locate(flag: Option<&Path>) -> Self {
        if let Some(path) = flag {
            return ConfigSource::Explicit(path.to_path_buf());
        }
        if let Some(path) = std::env::var_os(CONFIG_FILE_ENV).filter(|p| !p.is_empty()) {
            return ConfigSource::Explicit(PathBuf::from(path));
        }
        match default_config_path() {
            Some(path) => ConfigSource::Default(path),
            None => ConfigSource::None,
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl Config {
    /// Load and validate the configuration from `source`.
    pub fn load(source: &ConfigSource) -> Result<Self> {
        let config = match source {
            ConfigSource::Explicit(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                Self::from_file(path)?
            }
            ConfigSource::Default(path) if path.exists() => {
                tracing::info!("Loading configuration from: {}", path.display());
                Self::from_file(path)?
            }
            ConfigSource::Default(path) => {
                tracing::debug!("Config file not found at {}, using defaults", path.display());
                Self::default()
            }
            ConfigSource::None => {
                tracing::debug!("No config directory available, using defaults");
                Self::default()
            }
        };

        config.validate().map_err(Error::InvalidConfig)?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}
