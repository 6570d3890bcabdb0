//! Configuration module for treewatch
//!
//! Configuration can be loaded from TOML files and/or environment variables.
//! Command-line flags are applied on top by the binary.

mod defaults;
mod loading;

#[cfg(test)]
mod tests;

use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use defaults::{DEFAULT_DEBOUNCE_MS, DEFAULT_IGNORED_PATHS};

use defaults::*;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.treewatch/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".treewatch").join("config.toml"))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// File watcher configuration
    #[serde(default)]
    pub watcher: WatcherConfig,
}

/// Configuration for file watching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Debounce time in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Substrings ignored in addition to the built-in list
    #[serde(default)]
    pub extra_ignore: Vec<String>,

    /// Whether the initial tree walk follows symbolic links
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            extra_ignore: Vec::new(),
            follow_symlinks: false,
        }
    }
}

impl WatcherConfig {
    /// Get the debounce duration
    pub fn debounce_duration(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.watcher.debounce_ms == 0 {
            return Err(Error::config(
                "Invalid debounce_ms 0. Must be greater than zero",
            ));
        }

        if self
            .watcher
            .extra_ignore
            .iter()
            .any(|pattern| pattern.trim().is_empty())
        {
            return Err(Error::config(
                "Invalid extra_ignore entry: empty patterns would ignore every path",
            ));
        }

        Ok(())
    }

    /// Saves the configuration to a TOML file
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, toml_string)
            .context(format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }
}
