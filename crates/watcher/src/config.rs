//! Configuration for a watch session
//!
//! A [`SessionConfig`] is immutable once built. It can be assembled with the
//! builder or derived from the `[watcher]` section of the application
//! configuration.

use crate::ignore::PathFilter;
use std::time::Duration;
use treewatch_core::{WatcherConfig, DEFAULT_DEBOUNCE_MS};

/// Convert a caller-supplied delay in milliseconds into a debounce window
///
/// Absent, zero and negative values select the 500ms default.
pub fn delay_from_millis(ms: Option<i64>) -> Duration {
    match ms {
        Some(ms) if ms > 0 => Duration::from_millis(ms as u64),
        _ => Duration::from_millis(DEFAULT_DEBOUNCE_MS),
    }
}

/// Immutable configuration for one watch session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Debounce window (default: 500ms)
    pub delay: Duration,
    /// Paths that are never registered or reported
    pub filter: PathFilter,
    /// Whether tree walks follow symbolic links (default: false)
    pub follow_symlinks: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            filter: PathFilter::default(),
            follow_symlinks: false,
        }
    }
}

impl SessionConfig {
    /// Create configuration from builder
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    /// Derive a session configuration from the application's watcher section
    pub fn from_watcher_config(config: &WatcherConfig) -> Self {
        Self::builder()
            .delay(config.debounce_duration())
            .extra_ignore(config.extra_ignore.iter().cloned())
            .follow_symlinks(config.follow_symlinks)
            .build()
    }
}

/// Builder for SessionConfig
#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Set the debounce window; zero selects the default
    pub fn delay(mut self, delay: Duration) -> Self {
        self.config.delay = if delay.is_zero() {
            Duration::from_millis(DEFAULT_DEBOUNCE_MS)
        } else {
            delay
        };
        self
    }

    /// Set the debounce window from a possibly absent or non-positive value
    pub fn delay_ms(mut self, ms: Option<i64>) -> Self {
        self.config.delay = delay_from_millis(ms);
        self
    }

    /// Replace the ignore filter
    pub fn filter(mut self, filter: PathFilter) -> Self {
        self.config.filter = filter;
        self
    }

    /// Use the built-in ignore list plus `extra`
    pub fn extra_ignore<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.filter = PathFilter::with_additional(extra);
        self
    }

    /// Set whether to follow symlinks
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.follow_symlinks = follow;
        self
    }

    /// Build the configuration
    pub fn build(self) -> SessionConfig {
        self.config
    }
}
