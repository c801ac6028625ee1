//! Scan scheduler.
//!
//! One tick walks every configured root, diffs the result against that
//! root's snapshot and delivers the newly appeared files. The run loop
//! repeats ticks until the cancel channel disconnects.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};

use super::events::{DetectedFile, Handler};
use super::fs::FileSystem;
use super::shared::{SharedConfig, WatchConfig};
use super::snapshot::SnapshotStore;
use super::stats::WatcherStats;
use super::walker::walk;
use crate::config::OperatingMode;

/// Summary of a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Sequence number of the tick, starting at 1.
    pub tick: u64,
    /// Roots walked successfully.
    pub roots_scanned: usize,
    /// Roots that could not be walked.
    pub roots_failed: usize,
    /// Newly appeared files across all roots.
    pub files_detected: usize,
}

/// Owns the per-root snapshots and runs ticks against them.
///
/// Snapshots are only ever touched from the thread that owns the scanner.
pub struct Scanner {
    fs: Arc<dyn FileSystem>,
    snapshots: SnapshotStore,
    stats: Arc<WatcherStats>,
    ticks: u64,
}

impl Scanner {
    /// Create a scanner with empty snapshots.
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>, stats: Arc<WatcherStats>) -> Self {
        Self {
            fs,
            snapshots: SnapshotStore::new(),
            stats,
            ticks: 0,
        }
    }

    /// Snapshots accumulated so far.
    #[must_use]
    pub const fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// Run one full pass over every root in `config`.
    pub fn tick(&mut self, config: &WatchConfig) -> TickReport {
        self.ticks += 1;
        WatcherStats::add(&self.stats.ticks, 1);

        let mut report = TickReport {
            tick: self.ticks,
            ..TickReport::default()
        };

        self.snapshots.retain_roots(&config.roots);

        let handler = config.handler.as_ref();
        let mut burst: Vec<(PathBuf, PathBuf)> = Vec::new();

        for root in &config.roots {
            let walked = match walk(self.fs.as_ref(), root, config.depth) {
                Ok(walked) => walked,
                Err(e) => {
                    tracing::warn!(root = %root.display(), error = %e, "Root unreadable, skipping this tick");
                    WatcherStats::add(&self.stats.root_failures, 1);
                    report.roots_failed += 1;
                    if let Some(hook) = &config.error_hook {
                        hook(&e);
                    }
                    continue;
                }
            };

            report.roots_scanned += 1;
            WatcherStats::add(&self.stats.entries_skipped, walked.skipped);

            let appeared =
                self.snapshots
                    .diff(root, walked.files, config.ignore_startup_content);
            report.files_detected += appeared.len();
            WatcherStats::add(&self.stats.files_detected, appeared.len() as u64);

            match config.operating_mode {
                OperatingMode::Sequential => {
                    for path in appeared {
                        self.dispatch(handler, root, path);
                    }
                }
                OperatingMode::Burst => {
                    burst.extend(appeared.into_iter().map(|path| (root.clone(), path)));
                }
            }
        }

        for (root, path) in burst {
            self.dispatch(handler, &root, path);
        }

        tracing::debug!(
            tick = report.tick,
            scanned = report.roots_scanned,
            failed = report.roots_failed,
            detected = report.files_detected,
            "Scan tick complete"
        );

        report
    }

    /// Deliver one file to the handler.
    fn dispatch(&self, handler: Option<&Handler>, root: &Path, path: PathBuf) {
        let Some(handler) = handler else {
            tracing::debug!(path = %path.display(), "No handler set, file not delivered");
            return;
        };

        let reader = match self.fs.open(&path) {
            Ok(reader) => reader,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Could not open detected file");
                WatcherStats::add(&self.stats.open_failures, 1);
                return;
            }
        };

        let file = DetectedFile::new(root.to_path_buf(), path.clone(), reader);
        match handler(file) {
            Ok(()) => WatcherStats::add(&self.stats.files_dispatched, 1),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Handler failed");
                WatcherStats::add(&self.stats.handler_failures, 1);
            }
        }
    }

    /// Tick until `cancel` disconnects.
    ///
    /// The wait between ticks is interruptible. A tick that has started is
    /// always allowed to finish.
    pub fn run(mut self, config: &SharedConfig, cancel: &Receiver<()>) {
        let mut interval = config.scan_interval();
        let mut zero_warned = false;

        tracing::info!("Scan loop started");

        loop {
            if !matches!(cancel.try_recv(), Err(TryRecvError::Empty)) {
                break;
            }

            let snapshot = config.snapshot();
            if snapshot.scan_interval.is_zero() {
                if !zero_warned {
                    tracing::warn!(
                        interval_ms = interval.as_millis(),
                        "Scan interval set to zero, keeping previous interval"
                    );
                    zero_warned = true;
                }
            } else {
                interval = snapshot.scan_interval;
                zero_warned = false;
            }
            if interval.is_zero() {
                interval = Duration::from_millis(1);
            }

            self.tick(&snapshot);

            match cancel.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        tracing::info!(ticks = self.ticks, "Scan loop stopped");
    }
}
