//! Recursive directory registration
//!
//! The notification source watches single directories, so every directory
//! under a root has to be registered individually: once at setup, and again
//! for directories that appear later.

use crate::ignore::PathFilter;
use crate::source::NotificationSource;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use treewatch_core::error::{Error, Result};
use walkdir::WalkDir;

/// Walks directory trees and registers them with a notification source
#[derive(Clone)]
pub struct TreeRegistrar {
    source: Arc<dyn NotificationSource>,
    filter: PathFilter,
    follow_symlinks: bool,
}

impl TreeRegistrar {
    /// Create a registrar for `source`
    pub fn new(source: Arc<dyn NotificationSource>, filter: PathFilter, follow_symlinks: bool) -> Self {
        Self {
            source,
            filter,
            follow_symlinks,
        }
    }

    /// Register `root` and every non-ignored directory beneath it
    ///
    /// Fails if the root cannot be enumerated or registered. Descendants
    /// that cannot be read or registered are logged and skipped. Returns
    /// the number of paths registered.
    pub async fn register_tree(&self, root: &Path) -> Result<usize> {
        if self.filter.is_ignored(root) {
            warn!("Root {} matches the ignore list, not watching it", root.display());
            return Ok(0);
        }

        let dirs = self.walk(root).await?;
        let mut registered = 0;

        for dir in dirs {
            match self.source.add_watch(&dir).await {
                Ok(()) => registered += 1,
                Err(e) if dir == root => return Err(e),
                Err(e) => warn!("Error watching {}: {}", dir.display(), e),
            }
        }

        info!("Watching {} ({} directories)", root.display(), registered);
        Ok(registered)
    }

    /// Best-effort registration of a path observed being created
    ///
    /// Does nothing unless `path` is currently a non-ignored directory.
    /// Directories already created inside it are registered too. Failures
    /// are never surfaced.
    pub async fn register_late(&self, path: &Path) -> usize {
        if self.filter.is_ignored(path) {
            return 0;
        }

        match tokio::fs::metadata(path).await {
            Ok(metadata) if metadata.is_dir() => {}
            _ => return 0,
        }

        let dirs = match self.walk(path).await {
            Ok(dirs) => dirs,
            Err(e) => {
                debug!("Late registration of {} skipped: {}", path.display(), e);
                return 0;
            }
        };

        let mut registered = 0;
        for dir in dirs {
            match self.source.add_watch(&dir).await {
                Ok(()) => registered += 1,
                Err(e) => debug!("Late registration of {} failed: {}", dir.display(), e),
            }
        }

        if registered > 0 {
            debug!(
                "Registered {} new directories under {}",
                registered,
                path.display()
            );
        }
        registered
    }

    /// Collect `root` plus its non-ignored descendant directories
    async fn walk(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let root = root.to_path_buf();
        let filter = self.filter.clone();
        let follow_symlinks = self.follow_symlinks;

        // WalkDir is synchronous
        tokio::task::spawn_blocking(move || collect_directories(&root, &filter, follow_symlinks))
            .await
            .map_err(|e| Error::watcher(format!("Directory walk task failed: {e}")))?
    }
}

fn collect_directories(root: &Path, filter: &PathFilter, follow_symlinks: bool) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(follow_symlinks)
        .into_iter()
        .filter_entry(|entry| !filter.is_ignored(entry.path()));

    for entry in walker {
        match entry {
            // The root is registered whatever its type
            Ok(entry) if entry.depth() == 0 || entry.file_type().is_dir() => {
                dirs.push(entry.into_path());
            }
            Ok(_) => {}
            Err(e) if e.depth() == 0 => {
                return Err(Error::root_unreadable(root, e.to_string()));
            }
            Err(e) => {
                let path = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                warn!("Error walking {}: {}", path, e);
            }
        }
    }

    Ok(dirs)
}
