//! Core types for the treewatch file-change notifier
//!
//! This crate provides the foundational pieces shared by the watcher and
//! the command-line front end:
//!
//! - **Configuration**: layered file/environment configuration
//! - **Error handling**: unified error types
//!

pub mod config;
pub mod error;

// Re-export main types for convenience
pub use config::{Config, WatcherConfig, DEFAULT_DEBOUNCE_MS, DEFAULT_IGNORED_PATHS};
pub use error::{Error, Result, ResultExt};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Result, ResultExt};
}
