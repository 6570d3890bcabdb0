//! Tests for configuration module

use super::*;
use crate::error::{Error, Result};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn create_temp_config_file(content: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .map_err(|e| Error::config(format!("Failed to create temp file: {e}")))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::config(format!("Failed to write temp file: {e}")))?;
    file.flush()
        .map_err(|e| Error::config(format!("Failed to flush temp file: {e}")))?;
    Ok(file)
}

fn with_env_var<F, T>(key: &str, value: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    std::env::set_var(key, value);
    let result = f();
    std::env::remove_var(key);
    result
}

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.watcher.debounce_ms, 500);
    assert!(config.watcher.extra_ignore.is_empty());
    assert!(!config.watcher.follow_symlinks);
    assert_eq!(
        config.watcher.debounce_duration(),
        std::time::Duration::from_millis(500)
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_toml_str_valid() {
    let toml = r#"
        [watcher]
        debounce_ms = 100
        extra_ignore = ["target", "dist"]
        follow_symlinks = true
    "#;

    let config = Config::from_toml_str(toml).expect("Failed to parse valid TOML");
    assert_eq!(config.watcher.debounce_ms, 100);
    assert_eq!(config.watcher.extra_ignore, vec!["target", "dist"]);
    assert!(config.watcher.follow_symlinks);
}

#[test]
fn test_from_toml_str_minimal() {
    let config = Config::from_toml_str("").expect("Failed to parse empty TOML");
    assert_eq!(config.watcher.debounce_ms, DEFAULT_DEBOUNCE_MS);
}

#[test]
fn test_from_toml_str_invalid() {
    let result = Config::from_toml_str("[watcher\ndebounce_ms = ");
    assert!(result.is_err());
}

#[test]
fn test_from_file_missing_uses_defaults() {
    let config = Config::from_file(std::path::Path::new("/nonexistent/treewatch.toml"))
        .expect("missing file should fall back to defaults");
    assert_eq!(config.watcher.debounce_ms, DEFAULT_DEBOUNCE_MS);
}

#[test]
fn test_from_file() -> Result<()> {
    let file = create_temp_config_file(
        r#"
        [watcher]
        debounce_ms = 250
        extra_ignore = ["target"]
    "#,
    )?;

    let config = Config::from_file(file.path())?;
    assert_eq!(config.watcher.debounce_ms, 250);
    assert_eq!(config.watcher.extra_ignore, vec!["target"]);
    Ok(())
}

#[test]
fn test_env_overrides_file() -> Result<()> {
    let file = create_temp_config_file(
        r#"
        [watcher]
        debounce_ms = 250
    "#,
    )?;

    let config = with_env_var("TREEWATCH_WATCHER__FOLLOW_SYMLINKS", "true", || {
        Config::from_file(file.path())
    })?;
    assert_eq!(config.watcher.debounce_ms, 250);
    assert!(config.watcher.follow_symlinks);
    Ok(())
}

#[test]
fn test_later_files_override_earlier_ones() -> Result<()> {
    let global = create_temp_config_file(
        r#"
        [watcher]
        debounce_ms = 900
        extra_ignore = ["build"]
    "#,
    )?;
    let local = create_temp_config_file(
        r#"
        [watcher]
        debounce_ms = 120
    "#,
    )?;

    let config = Config::from_files(&[global.path(), local.path()])?;
    assert_eq!(config.watcher.debounce_ms, 120);
    // Keys absent from the later file keep the earlier file's value
    assert_eq!(config.watcher.extra_ignore, vec!["build"]);
    Ok(())
}

#[test]
fn test_from_files_skips_missing_files() -> Result<()> {
    let local = create_temp_config_file(
        r#"
        [watcher]
        debounce_ms = 75
    "#,
    )?;

    let config = Config::from_files(&[
        std::path::Path::new("/nonexistent/treewatch/global.toml"),
        local.path(),
    ])?;
    assert_eq!(config.watcher.debounce_ms, 75);
    Ok(())
}

#[test]
fn test_validate_rejects_zero_debounce() {
    let mut config = Config::default();
    config.watcher.debounce_ms = 0;
    let result = config.validate();
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Invalid debounce_ms"));
}

#[test]
fn test_validate_rejects_empty_ignore_entry() {
    let mut config = Config::default();
    config.watcher.extra_ignore = vec!["target".to_string(), "  ".to_string()];
    assert!(config.validate().is_err());
}

#[test]
fn test_save_round_trips_through_from_file() -> Result<()> {
    let dir = tempfile::tempdir()
        .map_err(|e| Error::config(format!("Failed to create temp dir: {e}")))?;
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.watcher.debounce_ms = 42;
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.watcher.debounce_ms, 42);
    Ok(())
}

#[test]
fn test_global_config_path() {
    if let Ok(path) = global_config_path() {
        assert!(path.ends_with(".treewatch/config.toml"));
    }
}

#[test]
fn test_default_ignore_list() {
    assert_eq!(
        DEFAULT_IGNORED_PATHS,
        &[".git", "node_modules", "vendor", "__pycache__"]
    );
}
