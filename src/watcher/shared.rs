//! Configuration shared between the engine and its scan thread.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::events::{ErrorHook, Handler};
use crate::config::{OperatingMode, Requirements};
use crate::{Error, Result};

/// Live watch configuration.
///
/// Cloning is cheap: the handler and error hook are reference counted.
#[derive(Clone)]
pub struct WatchConfig {
    pub roots: Vec<PathBuf>,
    pub depth: u32,
    pub ignore_startup_content: bool,
    pub scan_interval: Duration,
    pub operating_mode: OperatingMode,
    pub handler: Option<Handler>,
    pub error_hook: Option<ErrorHook>,
}

impl WatchConfig {
    /// Check the settings that `start` requires.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the scan interval is zero.
    pub fn validate(&self) -> Result<()> {
        if self.scan_interval.is_zero() {
            return Err(Error::config("scan interval must be greater than zero"));
        }
        Ok(())
    }
}

impl From<Requirements> for WatchConfig {
    fn from(req: Requirements) -> Self {
        Self {
            roots: req.roots,
            depth: req.depth,
            ignore_startup_content: req.ignore_startup_content,
            scan_interval: req.scan_frequency,
            operating_mode: req.operating_mode,
            handler: req.handler,
            error_hook: None,
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Requirements::default().into()
    }
}

impl fmt::Debug for WatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchConfig")
            .field("roots", &self.roots)
            .field("depth", &self.depth)
            .field("ignore_startup_content", &self.ignore_startup_content)
            .field("scan_interval", &self.scan_interval)
            .field("operating_mode", &self.operating_mode)
            .field("handler", &self.handler.is_some())
            .field("error_hook", &self.error_hook.is_some())
            .finish()
    }
}

/// Reader/writer-locked [`WatchConfig`].
///
/// Every getter copies out under a read lock and every setter replaces a
/// field under a write lock, so no caller can observe or hold on to a
/// partially written value.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<WatchConfig>>,
}

impl SharedConfig {
    /// Wrap a configuration.
    #[must_use]
    pub fn new(config: WatchConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Consistent copy of the whole configuration.
    #[must_use]
    pub fn snapshot(&self) -> WatchConfig {
        self.inner.read().clone()
    }

    #[must_use]
    pub fn roots(&self) -> Vec<PathBuf> {
        self.inner.read().roots.clone()
    }

    pub fn set_roots(&self, roots: Vec<PathBuf>) {
        self.inner.write().roots = roots;
    }

    #[must_use]
    pub fn depth(&self) -> u32 {
        self.inner.read().depth
    }

    pub fn set_depth(&self, depth: u32) {
        self.inner.write().depth = depth;
    }

    #[must_use]
    pub fn ignore_startup_content(&self) -> bool {
        self.inner.read().ignore_startup_content
    }

    pub fn set_ignore_startup_content(&self, ignore: bool) {
        self.inner.write().ignore_startup_content = ignore;
    }

    #[must_use]
    pub fn scan_interval(&self) -> Duration {
        self.inner.read().scan_interval
    }

    pub fn set_scan_interval(&self, interval: Duration) {
        self.inner.write().scan_interval = interval;
    }

    #[must_use]
    pub fn operating_mode(&self) -> OperatingMode {
        self.inner.read().operating_mode
    }

    pub fn set_operating_mode(&self, mode: OperatingMode) {
        self.inner.write().operating_mode = mode;
    }

    #[must_use]
    pub fn has_handler(&self) -> bool {
        self.inner.read().handler.is_some()
    }

    pub fn set_handler(&self, handler: Option<Handler>) {
        self.inner.write().handler = handler;
    }

    pub fn set_error_hook(&self, hook: Option<ErrorHook>) {
        self.inner.write().error_hook = hook;
    }
}
