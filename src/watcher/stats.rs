//! Scan loop counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Statistics for the scan loop.
#[derive(Debug, Default)]
pub struct WatcherStats {
    pub ticks: AtomicU64,
    pub files_detected: AtomicU64,
    pub files_dispatched: AtomicU64,
    pub handler_failures: AtomicU64,
    pub open_failures: AtomicU64,
    pub root_failures: AtomicU64,
    pub entries_skipped: AtomicU64,
}

impl WatcherStats {
    /// Create new stats tracker.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Get snapshot of current stats.
    #[must_use]
    pub fn snapshot(&self) -> WatcherStatsSnapshot {
        WatcherStatsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            files_detected: self.files_detected.load(Ordering::Relaxed),
            files_dispatched: self.files_dispatched.load(Ordering::Relaxed),
            handler_failures: self.handler_failures.load(Ordering::Relaxed),
            open_failures: self.open_failures.load(Ordering::Relaxed),
            root_failures: self.root_failures.load(Ordering::Relaxed),
            entries_skipped: self.entries_skipped.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }
}

/// Snapshot of watcher stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatcherStatsSnapshot {
    pub ticks: u64,
    pub files_detected: u64,
    pub files_dispatched: u64,
    pub handler_failures: u64,
    pub open_failures: u64,
    pub root_failures: u64,
    pub entries_skipped: u64,
}
