//! Default values and functions for configuration

/// Debounce delay used when none (or a non-positive one) is supplied
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Path fragments that are never watched nor reported
pub const DEFAULT_IGNORED_PATHS: &[&str] = &[".git", "node_modules", "vendor", "__pycache__"];

pub(crate) fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
