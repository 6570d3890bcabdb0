//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;
use tracing::debug;

use super::defaults::*;
use super::{global_config_path, Config};

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `TREEWATCH_` and use double underscores
    /// for nested values. For example:
    /// - `TREEWATCH_WATCHER__DEBOUNCE_MS=250`
    /// - `TREEWATCH_WATCHER__EXTRA_IGNORE=target,dist`
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_files(&[path])
    }

    /// Loads configuration from several TOML files, later files overriding
    /// earlier ones key by key, then applies environment variable overrides
    ///
    /// Files that do not exist are skipped.
    pub fn from_files(paths: &[&Path]) -> Result<Self> {
        let builder = ConfigLib::builder();

        // The config crate does not apply serde defaults for missing sections
        let builder =
            set_config_default(builder, "watcher.debounce_ms", default_debounce_ms() as i64)?;
        let builder =
            set_config_default(builder, "watcher.extra_ignore", Vec::<String>::new())?;
        let mut builder = set_config_default(builder, "watcher.follow_symlinks", false)?;

        for path in paths {
            if path.exists() {
                debug!("Loading configuration from {}", path.display());
                builder = builder.add_source(File::from(*path));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("TREEWATCH")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("watcher.extra_ignore")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load the layered configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Global config file (~/.treewatch/config.toml)
    /// 3. Custom --config file
    /// 4. Environment variables (TREEWATCH_*)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let global = match global_config_path() {
            Ok(path) => Some(path),
            Err(e) => {
                debug!("Skipping global configuration: {e}");
                None
            }
        };

        let paths: Vec<&Path> = global.as_deref().into_iter().chain(config_path).collect();
        Self::from_files(&paths)
    }
}
