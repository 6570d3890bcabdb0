//! In-memory notification source for tests
//!
//! `MockSource` records every registration and lets the test drive the
//! event and error streams by hand.

use crate::events::{EventKind, RawEvent};
use crate::source::{NotificationSource, SourceSender, SourceStreams};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use treewatch_core::error::{Error, Result};

/// Notification source that never touches the OS watcher
#[derive(Clone)]
pub struct MockSource {
    registered: Arc<Mutex<Vec<PathBuf>>>,
    failing: Arc<Mutex<HashSet<PathBuf>>>,
    registration_delay: Arc<Mutex<Duration>>,
    sender: Arc<Mutex<Option<SourceSender>>>,
}

impl MockSource {
    /// Create a mock source and its streams
    pub fn open() -> (Self, SourceStreams) {
        let (sender, streams) = SourceStreams::channel();
        (
            Self {
                registered: Arc::new(Mutex::new(Vec::new())),
                failing: Arc::new(Mutex::new(HashSet::new())),
                registration_delay: Arc::new(Mutex::new(Duration::ZERO)),
                sender: Arc::new(Mutex::new(Some(sender))),
            },
            streams,
        )
    }

    /// Make future registrations of `path` fail
    pub async fn fail_on(&self, path: impl Into<PathBuf>) {
        self.failing.lock().await.insert(path.into());
    }

    /// Make every registration take `delay` before completing
    pub async fn set_registration_delay(&self, delay: Duration) {
        *self.registration_delay.lock().await = delay;
    }

    /// Paths registered so far, in registration order
    pub async fn registered(&self) -> Vec<PathBuf> {
        self.registered.lock().await.clone()
    }

    /// Whether `path` has been registered
    pub async fn is_registered(&self, path: &Path) -> bool {
        self.registered.lock().await.iter().any(|p| p == path)
    }

    /// Push a raw event onto the event stream
    pub async fn emit(&self, path: impl Into<PathBuf>, kind: EventKind) -> bool {
        match self.sender.lock().await.as_ref() {
            Some(sender) => sender.send_event(RawEvent::new(path, kind)),
            None => false,
        }
    }

    /// Push a delivery error onto the error stream
    pub async fn emit_error(&self, message: impl Into<String>) -> bool {
        match self.sender.lock().await.as_ref() {
            Some(sender) => sender.send_error(Error::watcher(message)),
            None => false,
        }
    }

    /// Close both streams, as a real source does when it shuts down
    pub async fn close(&self) {
        self.sender.lock().await.take();
    }
}

#[async_trait]
impl NotificationSource for MockSource {
    async fn add_watch(&self, path: &Path) -> Result<()> {
        let delay = *self.registration_delay.lock().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().await.contains(path) {
            return Err(Error::registration(path, "mock registration failure"));
        }
        self.registered.lock().await.push(path.to_path_buf());
        Ok(())
    }
}
