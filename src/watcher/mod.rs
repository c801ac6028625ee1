//! Polling file watcher.
//!
//! This module provides:
//! - A pluggable filesystem layer (OS-backed and in-memory)
//! - A depth-limited walker that never follows symlinks
//! - Per-root snapshots that turn walks into "newly appeared" sets
//! - A scan scheduler with Sequential and Burst delivery
//! - The [`WatchEngine`] that owns the scan thread

mod engine;
mod events;
mod fs;
mod memory;
mod scanner;
mod shared;
mod snapshot;
mod stats;
mod walker;

pub use engine::{EngineState, WatchEngine};
pub use events::{DetectedFile, ErrorHook, Handler};
pub use fs::{DirEntry, EntryKind, FileSystem, OsFileSystem};
pub use memory::MemoryFileSystem;
pub use scanner::{Scanner, TickReport};
pub use shared::{SharedConfig, WatchConfig};
pub use snapshot::SnapshotStore;
pub use stats::{WatcherStats, WatcherStatsSnapshot};
pub use walker::{walk, Walk};
