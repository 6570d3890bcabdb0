//! Per-path debouncing
//!
//! Every path that triggers gets one pending timer. A new trigger for the
//! same path aborts the old timer and schedules a fresh one, so the callback
//! runs once, `delay` after the last trigger of a burst.
//!
//! For a given path, replacing the timer (in [`Debouncer::trigger`]) and
//! removing the entry when the timer fires both happen under that key's map
//! lock. The firing timer only removes the entry if its generation is still
//! current; a timer that lost the race exits without calling back.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, trace, warn};

/// Receives debounced change notifications
///
/// Implemented for any `Fn(&Path) -> anyhow::Result<()>` closure.
pub trait ChangeCallback: Send + Sync + 'static {
    /// Called once per burst with the path that changed
    fn on_change(&self, path: &Path) -> anyhow::Result<()>;
}

impl<F> ChangeCallback for F
where
    F: Fn(&Path) -> anyhow::Result<()> + Send + Sync + 'static,
{
    fn on_change(&self, path: &Path) -> anyhow::Result<()> {
        self(path)
    }
}

/// Scheduled firing for one path
struct PendingTrigger {
    generation: u64,
    timer: JoinHandle<()>,
}

/// Coalesces repeated triggers per path into one delayed callback
pub struct Debouncer {
    /// Debounce window duration
    delay: Duration,
    /// Shared by every timer of the session
    callback: Arc<dyn ChangeCallback>,
    /// Map of paths to pending timers
    pending: Arc<DashMap<PathBuf, PendingTrigger>>,
    /// Source of timer generations
    generation: AtomicU64,
}

impl Debouncer {
    /// Create a new debouncer
    pub fn new(delay: Duration, callback: Arc<dyn ChangeCallback>) -> Self {
        Self {
            delay,
            callback,
            pending: Arc::new(DashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// The debounce window
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record or refresh a pending firing for `path`
    ///
    /// Must be called from within a Tokio runtime.
    pub fn trigger(&self, path: PathBuf) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;

        match self.pending.entry(path.clone()) {
            Entry::Occupied(mut entry) => {
                trace!("Restarting debounce timer for {:?}", path);
                entry.get().timer.abort();
                let timer = self.schedule(path, generation);
                entry.insert(PendingTrigger { generation, timer });
            }
            Entry::Vacant(entry) => {
                debug!("New pending trigger for {:?}", path);
                let timer = self.schedule(path, generation);
                entry.insert(PendingTrigger { generation, timer });
            }
        }
    }

    /// Spawn the timer task for one generation of `path`
    fn schedule(&self, path: PathBuf, generation: u64) -> JoinHandle<()> {
        let pending = Arc::clone(&self.pending);
        let callback = Arc::clone(&self.callback);
        let delay = self.delay;

        tokio::spawn(async move {
            sleep(delay).await;

            let fired = pending
                .remove_if(&path, |_, trigger| trigger.generation == generation)
                .is_some();
            if !fired {
                trace!("Debounce timer for {:?} was superseded", path);
                return;
            }

            deliver(callback, path).await;
        })
    }

    /// Abort every pending timer without calling back
    pub fn cancel_all(&self) {
        let mut cancelled = 0;
        self.pending.retain(|_, trigger| {
            trigger.timer.abort();
            cancelled += 1;
            false
        });

        if cancelled > 0 {
            debug!("Cancelled {} pending triggers", cancelled);
        }
    }

    /// Get the number of pending triggers
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether `path` has a pending trigger
    pub fn is_pending(&self, path: &Path) -> bool {
        self.pending.contains_key(path)
    }
}

/// Run the callback on the blocking pool, outside any map lock
async fn deliver(callback: Arc<dyn ChangeCallback>, path: PathBuf) {
    debug!("Emitting debounced change for {:?}", path);
    let shown = path.display().to_string();

    match tokio::task::spawn_blocking(move || callback.on_change(&path)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Callback failed for {}: {:#}", shown, e),
        Err(e) => error!("Callback panicked for {}: {}", shown, e),
    }
}
