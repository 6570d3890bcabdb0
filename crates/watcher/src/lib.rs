#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! Debounced, recursive file-change notification
//!
//! This crate watches one or more directory trees and calls back once per
//! burst of changes to a path:
//! - Recursive registration of every directory under each root
//! - Late registration of directories created while watching
//! - Per-path debouncing with a restartable timer
//! - A fixed substring ignore list (`.git`, `node_modules`, ...)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! treewatch_watcher::watch(
//!     ["/path/to/project"],
//!     |path: &Path| -> anyhow::Result<()> {
//!         println!("changed: {}", path.display());
//!         Ok(())
//!     },
//!     Some(200),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

// Private implementation modules
mod config;
mod debouncer;
mod event_loop;
mod events;
mod ignore;
mod registrar;
mod source;
mod watcher;

#[cfg(test)]
mod mock;

// Public exports
pub use config::{delay_from_millis, SessionConfig, SessionConfigBuilder};
pub use debouncer::{ChangeCallback, Debouncer};
pub use event_loop::{EventLoop, EventLoopStats};
pub use events::{EventKind, RawEvent};
pub use ignore::PathFilter;
pub use registrar::TreeRegistrar;
pub use source::{NotificationSource, NotifySource, SourceSender, SourceStreams};
pub use watcher::{watch, WatchHandle, WatchSession};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::SessionConfig;
    pub use crate::debouncer::ChangeCallback;
    pub use crate::watcher::{watch, WatchHandle, WatchSession};
}
