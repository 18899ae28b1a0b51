//! Run configuration.
//!
//! Settings come from a TOML file (an explicit `--config` path, or
//! `<config dir>/hashsweep/config.toml` when it exists) and are then
//! overridden by command-line flags. Missing keys keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::hash::{HashUtilityError, DEFAULT_CHUNK_SIZE, DEFAULT_SAMPLE_INTERVAL};

/// Name of the directory under the user's config dir.
const APP_DIR: &str = "hashsweep";
const CONFIG_FILE: &str = "config.toml";

/// Hashing run configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Number of hash worker threads.
    pub workers: usize,
    /// Read size per chunk in bytes.
    pub chunk_size: usize,
    /// Progress sampling period in milliseconds.
    pub sample_interval_ms: u64,
    /// Sort CSV rows by path instead of completion order.
    pub sort_reports: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: crate::hash::default_workers(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL.as_millis() as u64,
            sort_reports: false,
        }
    }
}

impl Config {
    /// Default config file location, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used when present and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, HashUtilityError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, HashUtilityError> {
        let text = fs::read_to_string(path).map_err(|e| {
            HashUtilityError::from_io_error(e, "reading config", Some(path.to_path_buf()))
        })?;
        let config = Self::from_toml(&text).map_err(|reason| HashUtilityError::ConfigError {
            path: path.to_path_buf(),
            reason,
        })?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self, String> {
        let config: Config = toml::from_str(text).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every numeric setting is positive.
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("workers must be at least 1".to_string());
        }
        if self.chunk_size == 0 {
            return Err("chunk_size must be at least 1 byte".to_string());
        }
        if self.sample_interval_ms == 0 {
            return Err("sample_interval_ms must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}
