//! Watch sessions
//!
//! A session registers one or more directory trees, then hands the source's
//! streams to a background [`EventLoop`]. [`watch`] is the fire-and-forget
//! entry point; [`WatchSession`] returns a [`WatchHandle`] for callers that
//! want to stop the session later.

use crate::{
    config::{SessionConfig, SessionConfigBuilder},
    debouncer::{ChangeCallback, Debouncer},
    event_loop::{EventLoop, EventLoopStats},
    registrar::TreeRegistrar,
    source::{NotificationSource, NotifySource, SourceStreams},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use treewatch_core::error::{Error, Result};

/// Watch `paths` recursively and call `callback` for every debounced change
///
/// `delay_ms` of `None`, zero or a negative value selects the 500ms default.
/// Returns once every root is registered; the event loop keeps running in
/// the background for the life of the runtime.
pub async fn watch<I, P, C>(paths: I, callback: C, delay_ms: Option<i64>) -> Result<()>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
    C: ChangeCallback,
{
    let config = SessionConfig::builder().delay_ms(delay_ms).build();
    let _handle = WatchSession::new(config).start(paths, callback).await?;
    Ok(())
}

/// Sets up watch sessions from a [`SessionConfig`]
#[derive(Debug, Clone, Default)]
pub struct WatchSession {
    config: SessionConfig,
}

impl WatchSession {
    /// Create a session with the given configuration
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Start from a configuration builder
    pub fn builder() -> SessionConfigBuilder {
        SessionConfig::builder()
    }

    /// The session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Watch `paths` with the platform notification source
    pub async fn start<I, P, C>(&self, paths: I, callback: C) -> Result<WatchHandle>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
        C: ChangeCallback,
    {
        let roots = collect_roots(paths)?;
        let (source, streams) = NotifySource::open()?;
        self.start_with_source(roots, Arc::new(source), streams, Arc::new(callback))
            .await
    }

    /// Watch `roots` with an already opened notification source
    ///
    /// On error the source and streams are dropped and nothing keeps running.
    pub async fn start_with_source(
        &self,
        roots: Vec<PathBuf>,
        source: Arc<dyn NotificationSource>,
        streams: SourceStreams,
        callback: Arc<dyn ChangeCallback>,
    ) -> Result<WatchHandle> {
        if roots.is_empty() {
            return Err(Error::invalid_input("No paths to watch"));
        }

        let debouncer = Arc::new(Debouncer::new(self.config.delay, callback));
        let registrar = TreeRegistrar::new(
            source,
            self.config.filter.clone(),
            self.config.follow_symlinks,
        );

        for root in &roots {
            registrar.register_tree(root).await?;
        }

        let cancel = CancellationToken::new();
        let event_loop = EventLoop::new(
            streams,
            self.config.filter.clone(),
            Arc::clone(&debouncer),
            registrar,
            cancel.clone(),
        );
        let task = tokio::spawn(event_loop.run());

        info!(
            "Watching {} root(s) with a {:?} debounce window",
            roots.len(),
            self.config.delay
        );

        Ok(WatchHandle {
            roots,
            debouncer,
            cancel,
            task,
        })
    }
}

fn collect_roots<I, P>(paths: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let roots: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
    if roots.is_empty() {
        return Err(Error::invalid_input("No paths to watch"));
    }
    Ok(roots)
}

/// Lifecycle control for a running session
///
/// Dropping the handle leaves the session running.
pub struct WatchHandle {
    roots: Vec<PathBuf>,
    debouncer: Arc<Debouncer>,
    cancel: CancellationToken,
    task: JoinHandle<EventLoopStats>,
}

impl WatchHandle {
    /// Roots this session was started with
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Whether `path` lies under one of the roots
    pub fn is_watching(&self, path: &Path) -> bool {
        self.roots.iter().any(|root| path.starts_with(root))
    }

    /// Number of paths waiting for their debounce window to elapse
    pub fn pending_count(&self) -> usize {
        self.debouncer.pending_count()
    }

    /// Whether the event loop is still running
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the event loop and drop pending triggers without calling back
    pub async fn shutdown(self) -> Result<EventLoopStats> {
        self.cancel.cancel();
        let stats = self
            .task
            .await
            .map_err(|e| Error::watcher(format!("Event loop task failed: {e}")))?;
        self.debouncer.cancel_all();
        debug!("Watch session stopped");
        Ok(stats)
    }

    /// Wait for the event loop to end on its own
    pub async fn join(self) -> Result<EventLoopStats> {
        self.task
            .await
            .map_err(|e| Error::watcher(format!("Event loop task failed: {e}")))
    }
}
