//! Path ignore matching
//!
//! This module decides which paths are never watched and never reported.
//! Matching is a plain substring test against the path's string form, so
//! `.git` excludes `repo/.git/HEAD` as well as `repo/.gitignore`.

use std::path::Path;
use std::sync::Arc;
use tracing::trace;
use treewatch_core::DEFAULT_IGNORED_PATHS;

/// Immutable ignore list shared by the registrar and the event loop
///
/// Cloning is cheap; the patterns live behind an `Arc`.
#[derive(Debug, Clone)]
pub struct PathFilter {
    /// Substrings that exclude a path when found anywhere in it
    patterns: Arc<[String]>,
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORED_PATHS.iter().copied())
    }
}

impl PathFilter {
    /// Create a filter from an explicit list of substrings
    ///
    /// Empty entries are dropped, since they would match every path.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(Into::into)
            .filter(|p| !p.is_empty())
            .collect();

        Self {
            patterns: patterns.into(),
        }
    }

    /// Create a filter with the built-in list plus additional substrings
    pub fn with_additional<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = DEFAULT_IGNORED_PATHS
            .iter()
            .map(|p| (*p).to_string())
            .chain(extra.into_iter().map(Into::into));
        Self::new(patterns)
    }

    /// Check if a path should be ignored
    pub fn is_ignored(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        let ignored = self
            .patterns
            .iter()
            .any(|pattern| path_str.contains(pattern.as_str()));

        if ignored {
            trace!("Ignoring path: {:?}", path);
        }
        ignored
    }

    /// The active substrings
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
