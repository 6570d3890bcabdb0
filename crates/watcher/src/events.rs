//! Raw change events
//!
//! This module defines the `(path, kind)` pairs the event loop consumes and
//! their conversion from `notify` events.

use notify::event::ModifyKind;
use notify::EventKind as NotifyKind;
use std::path::PathBuf;

/// Operation kind of a raw change event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Path was created
    Create,
    /// Path contents were written
    Write,
    /// Path was removed
    Remove,
    /// Path was renamed (either side of the rename)
    Rename,
    /// Path metadata (permissions, timestamps) changed
    Chmod,
    /// Backend reported an unclassified change
    Other,
}

impl EventKind {
    /// Map a `notify` event kind onto ours
    ///
    /// Access events (open, close, read) are not changes and map to `None`.
    pub fn from_notify(kind: &NotifyKind) -> Option<Self> {
        match kind {
            NotifyKind::Create(_) => Some(Self::Create),
            NotifyKind::Modify(ModifyKind::Name(_)) => Some(Self::Rename),
            NotifyKind::Modify(ModifyKind::Metadata(_)) => Some(Self::Chmod),
            NotifyKind::Modify(_) => Some(Self::Write),
            NotifyKind::Remove(_) => Some(Self::Remove),
            NotifyKind::Access(_) => None,
            NotifyKind::Any | NotifyKind::Other => Some(Self::Other),
        }
    }
}

/// A single `(path, kind)` change reported by the notification source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Path that changed
    pub path: PathBuf,
    /// Type of change
    pub kind: EventKind,
}

impl RawEvent {
    /// Create a new raw event
    pub fn new(path: impl Into<PathBuf>, kind: EventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Split a `notify` event into one raw event per affected path
    ///
    /// Renames that carry both the old and new path yield two events.
    pub fn from_notify(event: notify::Event) -> Vec<Self> {
        let Some(kind) = EventKind::from_notify(&event.kind) else {
            return Vec::new();
        };

        event
            .paths
            .into_iter()
            .map(|path| Self { path, kind })
            .collect()
    }

    /// Whether the path may be a directory that just appeared in the tree
    ///
    /// Covers creations and renames, since a directory moved in from
    /// outside only shows up as the destination side of a rename.
    pub fn may_add_directory(&self) -> bool {
        matches!(self.kind, EventKind::Create | EventKind::Rename)
    }
}
