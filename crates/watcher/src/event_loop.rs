//! Event loop
//!
//! Consumes the raw event and error streams of a notification source until
//! both close or the session is cancelled. Non-ignored events trigger the
//! debouncer. Creations and renames are also handed to the registrar, on a
//! separate task, so that new or moved-in directories start reporting.

use crate::debouncer::Debouncer;
use crate::events::RawEvent;
use crate::ignore::PathFilter;
use crate::registrar::TreeRegistrar;
use crate::source::SourceStreams;
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};
use treewatch_core::error::Error;

/// Counters collected while the loop runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventLoopStats {
    /// Raw events received
    pub events: u64,
    /// Events dropped by the path filter
    pub ignored: u64,
    /// Source errors logged
    pub errors: u64,
    /// Directories registered after setup
    pub late_registrations: u64,
}

/// Per-event work, split out so the stream handling stays small
struct EventDispatch {
    filter: PathFilter,
    debouncer: Arc<Debouncer>,
    registrar: TreeRegistrar,
    /// Late registrations in flight
    registrations: JoinSet<usize>,
    stats: EventLoopStats,
}

impl EventDispatch {
    fn handle_event(&mut self, event: RawEvent) {
        self.stats.events += 1;

        if self.filter.is_ignored(&event.path) {
            self.stats.ignored += 1;
            return;
        }

        trace!("{:?} {}", event.kind, event.path.display());

        let may_add_directory = event.may_add_directory();
        self.debouncer.trigger(event.path.clone());

        if may_add_directory {
            let registrar = self.registrar.clone();
            self.registrations
                .spawn(async move { registrar.register_late(&event.path).await });
        }
    }

    fn handle_error(&mut self, error: Error) {
        self.stats.errors += 1;
        warn!("Watcher error: {}", error);
    }

    fn registration_finished(&mut self, result: std::result::Result<usize, JoinError>) {
        match result {
            Ok(registered) => self.stats.late_registrations += registered as u64,
            Err(e) => error!("Late registration task failed: {}", e),
        }
    }

    /// Wait for the registrations still running
    async fn drain_registrations(&mut self) {
        while let Some(result) = self.registrations.join_next().await {
            self.registration_finished(result);
        }
    }
}

/// Drives one watch session's streams
pub struct EventLoop {
    streams: SourceStreams,
    dispatch: EventDispatch,
    cancel: CancellationToken,
}

impl EventLoop {
    /// Create a loop over `streams`
    pub fn new(
        streams: SourceStreams,
        filter: PathFilter,
        debouncer: Arc<Debouncer>,
        registrar: TreeRegistrar,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            streams,
            dispatch: EventDispatch {
                filter,
                debouncer,
                registrar,
                registrations: JoinSet::new(),
                stats: EventLoopStats::default(),
            },
            cancel,
        }
    }

    /// Run until both streams close or the token is cancelled
    pub async fn run(self) -> EventLoopStats {
        let Self {
            streams:
                SourceStreams {
                    mut events,
                    mut errors,
                },
            mut dispatch,
            cancel,
        } = self;

        let mut events_open = true;
        let mut errors_open = true;

        while events_open || errors_open {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Event loop cancelled");
                    break;
                }
                event = events.recv(), if events_open => match event {
                    Some(event) => dispatch.handle_event(event),
                    None => {
                        debug!("Event stream closed");
                        events_open = false;
                    }
                },
                error = errors.recv(), if errors_open => match error {
                    Some(error) => dispatch.handle_error(error),
                    None => {
                        debug!("Error stream closed");
                        errors_open = false;
                    }
                },
                Some(result) = dispatch.registrations.join_next(),
                    if !dispatch.registrations.is_empty() =>
                {
                    dispatch.registration_finished(result);
                }
            }
        }

        dispatch.drain_registrations().await;

        let stats = dispatch.stats;
        info!(
            "Event loop stopped: {} events, {} ignored, {} errors, {} late registrations",
            stats.events, stats.ignored, stats.errors, stats.late_registrations
        );
        stats
    }
}
