//! Settings
//!
//! Optional JSON file under the user config dir
//! (`~/.config/osd-audio-monitor/config.json`). Every field can also be
//! given on the command line, which takes precedence.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Args;
use crate::error::MonitorError;
use crate::launcher::DEFAULT_CLIENT;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client_path: Option<String>,
    pub show_device_name: bool,
    pub device_map: Option<PathBuf>,
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("osd-audio-monitor").join("config.json"))
    }

    /// Load `explicit` if given, otherwise the default file if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, MonitorError> {
        match explicit {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self, MonitorError> {
        let text = std::fs::read_to_string(path).map_err(|source| MonitorError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| MonitorError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }
}

/// Effective settings after merging the command line over the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub client: String,
    pub show_device_name: bool,
    pub device_map: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(args: Args, config: Config) -> Self {
        Self {
            client: args
                .client_path
                .or(config.client_path)
                .unwrap_or_else(|| DEFAULT_CLIENT.to_string()),
            show_device_name: args.show_device_name || config.show_device_name,
            device_map: args.device_map.or(config.device_map),
        }
    }
}
