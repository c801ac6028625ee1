//! Watch engine: configuration accessors plus start/stop lifecycle.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;

use crossbeam_channel::{bounded, Sender};
use parking_lot::{Mutex, RwLock};

use super::events::{DetectedFile, ErrorHook, Handler};
use super::fs::{FileSystem, OsFileSystem};
use super::scanner::Scanner;
use super::shared::{SharedConfig, WatchConfig};
use super::stats::{WatcherStats, WatcherStatsSnapshot};
use crate::config::{OperatingMode, Requirements};
use crate::error::WatcherError;
use crate::{Error, Result};

/// Name given to the background scan thread.
const SCAN_THREAD_NAME: &str = "watchdog-scan";

/// Lifecycle state of a [`WatchEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Stopping,
}

struct Worker {
    handle: JoinHandle<()>,
    // Dropping the sender disconnects the channel and stops the loop.
    cancel: Sender<()>,
}

/// Polling watcher that reports files newly appearing under its roots.
///
/// Configuration can be read and changed at any time; changes apply from
/// the next tick. A `stop` from the scan thread (for example inside the
/// handler) is rejected with [`WatcherError::Reentrant`], including while
/// another thread is already stopping the engine. Handlers must not call
/// [`WatchEngine::start`] on their own engine.
///
/// If the handler panics the scan thread dies, but the engine reports
/// [`EngineState::Running`] until [`WatchEngine::stop`] joins the thread
/// and returns the panic as an internal error.
pub struct WatchEngine {
    config: SharedConfig,
    fs: Arc<dyn FileSystem>,
    stats: Arc<WatcherStats>,
    state: RwLock<EngineState>,
    worker: Mutex<Option<Worker>>,
    scan_thread: RwLock<Option<ThreadId>>,
}

impl WatchEngine {
    /// Create an engine on the OS filesystem. `None` uses the defaults of
    /// [`Requirements::default`].
    #[must_use]
    pub fn new(requirements: Option<Requirements>) -> Self {
        Self::with_file_system(requirements, Arc::new(OsFileSystem::new()))
    }

    /// Create an engine on a caller-supplied filesystem.
    #[must_use]
    pub fn with_file_system(requirements: Option<Requirements>, fs: Arc<dyn FileSystem>) -> Self {
        let config = WatchConfig::from(requirements.unwrap_or_default());
        Self {
            config: SharedConfig::new(config),
            fs,
            stats: WatcherStats::new(),
            state: RwLock::new(EngineState::Idle),
            worker: Mutex::new(None),
            scan_thread: RwLock::new(None),
        }
    }

    /// Validate the configuration and spawn the scan thread.
    ///
    /// Snapshots always start empty, so every root gets first-scan
    /// treatment after a restart.
    ///
    /// # Errors
    ///
    /// Returns [`WatcherError::AlreadyRunning`] if the engine is running, a
    /// configuration error if the scan interval is zero, or an internal
    /// error if the thread cannot be spawned.
    pub fn start(&self) -> Result<()> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return Err(WatcherError::AlreadyRunning.into());
        }

        let config = self.config.snapshot();
        config.validate()?;
        if config.roots.is_empty() {
            tracing::warn!("Starting watch engine with no roots configured");
        }

        let (cancel, cancel_rx) = bounded::<()>(0);
        let scanner = Scanner::new(Arc::clone(&self.fs), Arc::clone(&self.stats));
        let shared = self.config.clone();

        let handle = thread::Builder::new()
            .name(SCAN_THREAD_NAME.to_string())
            .spawn(move || scanner.run(&shared, &cancel_rx))
            .map_err(|e| Error::internal(format!("failed to spawn scan thread: {e}")))?;

        *self.scan_thread.write() = Some(handle.thread().id());
        *worker = Some(Worker { handle, cancel });
        *self.state.write() = EngineState::Running;

        tracing::info!(
            roots = config.roots.len(),
            depth = config.depth,
            interval_ms = config.scan_interval.as_millis(),
            mode = %config.operating_mode,
            ignore_startup = config.ignore_startup_content,
            "Watch engine started"
        );

        Ok(())
    }

    /// Signal the scan thread and wait for it to exit.
    ///
    /// A no-op when idle. Concurrent callers wait for the first to finish
    /// and then return.
    ///
    /// # Errors
    ///
    /// Returns [`WatcherError::Reentrant`] when called from the scan thread,
    /// or an internal error if the scan thread panicked. The engine is
    /// `Idle` afterwards in the latter case.
    pub fn stop(&self) -> Result<()> {
        // Checked before locking: a foreground stop holds the lock while it
        // joins this very thread.
        if self.is_scan_thread() {
            return Err(WatcherError::Reentrant.into());
        }

        let mut slot = self.worker.lock();
        let Some(worker) = slot.take() else {
            return Ok(());
        };

        if worker.handle.thread().id() == thread::current().id() {
            *slot = Some(worker);
            return Err(WatcherError::Reentrant.into());
        }

        *self.state.write() = EngineState::Stopping;
        let Worker { handle, cancel } = worker;
        drop(cancel);
        let joined = handle.join();
        *self.scan_thread.write() = None;
        *self.state.write() = EngineState::Idle;

        if joined.is_err() {
            tracing::error!("Scan thread panicked");
            return Err(Error::internal("scan thread panicked"));
        }

        tracing::info!("Watch engine stopped");
        Ok(())
    }

    fn is_scan_thread(&self) -> bool {
        *self.scan_thread.read() == Some(thread::current().id())
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        *self.state.read()
    }

    /// Whether the scan thread is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == EngineState::Running
    }

    /// Counters accumulated across all runs of this engine.
    #[must_use]
    pub fn stats(&self) -> WatcherStatsSnapshot {
        self.stats.snapshot()
    }

    /// Configured roots.
    #[must_use]
    pub fn roots(&self) -> Vec<PathBuf> {
        self.config.roots()
    }

    /// Replace the root list.
    pub fn set_roots<I, P>(&self, roots: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config
            .set_roots(roots.into_iter().map(Into::into).collect());
    }

    /// Depth limit below each root.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.config.depth()
    }

    pub fn set_depth(&self, depth: u32) {
        self.config.set_depth(depth);
    }

    #[must_use]
    pub fn ignore_startup_content(&self) -> bool {
        self.config.ignore_startup_content()
    }

    pub fn set_ignore_startup_content(&self, ignore: bool) {
        self.config.set_ignore_startup_content(ignore);
    }

    #[must_use]
    pub fn scan_interval(&self) -> Duration {
        self.config.scan_interval()
    }

    pub fn set_scan_interval(&self, interval: Duration) {
        self.config.set_scan_interval(interval);
    }

    #[must_use]
    pub fn operating_mode(&self) -> OperatingMode {
        self.config.operating_mode()
    }

    pub fn set_operating_mode(&self, mode: OperatingMode) {
        self.config.set_operating_mode(mode);
    }

    /// Whether a handler is installed.
    #[must_use]
    pub fn has_handler(&self) -> bool {
        self.config.has_handler()
    }

    /// Install the callback for newly detected files.
    pub fn set_handler<F>(&self, handler: F)
    where
        F: Fn(DetectedFile) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        self.config.set_handler(Some(handler));
    }

    /// Remove the handler. Detection continues but nothing is delivered.
    pub fn clear_handler(&self) {
        self.config.set_handler(None);
    }

    /// Install a callback for roots that cannot be scanned.
    pub fn set_error_hook<F>(&self, hook: F)
    where
        F: Fn(&WatcherError) + Send + Sync + 'static,
    {
        let hook: ErrorHook = Arc::new(hook);
        self.config.set_error_hook(Some(hook));
    }
}

impl Default for WatchEngine {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for WatchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchEngine")
            .field("config", &self.config.snapshot())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Drop for WatchEngine {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!(error = %e, "Failed to stop watch engine on drop");
        }
    }
}
