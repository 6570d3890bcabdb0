//! Notification source abstraction
//!
//! The OS-level change primitive is reached through [`NotificationSource`].
//! Opening a source yields the source itself (used to register directories)
//! and a pair of streams: raw change events and delivery errors. Both streams
//! close when the source is dropped.

use crate::events::RawEvent;
use async_trait::async_trait;
use notify::{
    Config as NotifyConfig, Event as NotifyEvent, RecommendedWatcher, RecursiveMode,
    Watcher as NotifyWatcher,
};
use std::path::Path;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, trace};
use treewatch_core::error::{Error, Result};

/// Registers paths with an underlying change-notification primitive
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// Start receiving change events for `path` (non-recursively)
    async fn add_watch(&self, path: &Path) -> Result<()>;
}

/// Receiving side of a notification source
pub struct SourceStreams {
    /// Raw change events
    pub events: mpsc::UnboundedReceiver<RawEvent>,
    /// Delivery errors reported by the primitive
    pub errors: mpsc::UnboundedReceiver<Error>,
}

impl SourceStreams {
    /// Create a connected sender/streams pair
    ///
    /// The channels are unbounded so the producer never blocks and never
    /// drops an event.
    pub fn channel() -> (SourceSender, SourceStreams) {
        let (events_tx, events) = mpsc::unbounded_channel();
        let (errors_tx, errors) = mpsc::unbounded_channel();
        (
            SourceSender {
                events: events_tx,
                errors: errors_tx,
            },
            SourceStreams { events, errors },
        )
    }
}

/// Producing side of a notification source
#[derive(Clone)]
pub struct SourceSender {
    events: mpsc::UnboundedSender<RawEvent>,
    errors: mpsc::UnboundedSender<Error>,
}

impl SourceSender {
    /// Send a raw event; returns false once the streams are gone
    pub fn send_event(&self, event: RawEvent) -> bool {
        self.events.send(event).is_ok()
    }

    /// Send a delivery error; returns false once the streams are gone
    pub fn send_error(&self, error: Error) -> bool {
        self.errors.send(error).is_ok()
    }

    /// Forward a `notify` callback result onto the streams
    fn forward(&self, result: notify::Result<NotifyEvent>) {
        match result {
            Ok(event) => {
                trace!("Received notify event: {:?}", event);
                for raw in RawEvent::from_notify(event) {
                    if !self.send_event(raw) {
                        debug!("Event stream closed, dropping notify event");
                        return;
                    }
                }
            }
            Err(e) => {
                let error = if e.paths.is_empty() {
                    Error::watcher(e.to_string())
                } else {
                    Error::watcher(format!("{e} ({:?})", e.paths))
                };
                if !self.send_error(error) {
                    debug!("Error stream closed, dropping notify error");
                }
            }
        }
    }
}

/// [`NotificationSource`] backed by the platform's recommended `notify` watcher
pub struct NotifySource {
    /// Active notify watcher
    watcher: Mutex<RecommendedWatcher>,
}

impl NotifySource {
    /// Construct the platform watcher and its streams
    pub fn open() -> Result<(Self, SourceStreams)> {
        let (sender, streams) = SourceStreams::channel();

        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<NotifyEvent>| sender.forward(res),
            NotifyConfig::default(),
        )
        .map_err(|e| Error::watcher(format!("Error creating watcher: {e}")))?;

        Ok((
            Self {
                watcher: Mutex::new(watcher),
            },
            streams,
        ))
    }
}

#[async_trait]
impl NotificationSource for NotifySource {
    async fn add_watch(&self, path: &Path) -> Result<()> {
        self.watcher
            .lock()
            .await
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| Error::registration(path, e.to_string()))
    }
}
