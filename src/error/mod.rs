//! Error types and Result aliases for watchdog.
//!
//! This module defines the error hierarchy used throughout the crate.
//! Lifecycle calls return `Result<T, Error>`; per-root and per-entry
//! failures inside the scan loop are [`WatcherError`] values that are
//! logged and reported, never propagated out of the loop.

use std::path::Path;

use thiserror::Error;

/// Result type alias using watchdog's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for watchdog operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// File watching error.
    #[error("watcher error: {0}")]
    Watcher(#[from] WatcherError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// File watcher errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WatcherError {
    /// A configured root is missing, not a directory, or cannot be listed.
    #[error("root '{root}' is unreadable: {reason}")]
    RootUnreadable { root: String, reason: String },

    /// A single entry below a root failed mid-walk.
    #[error("failed to read entry '{path}': {reason}")]
    EntryRead { path: String, reason: String },

    /// `start` was called on an engine that is already running.
    #[error("watch engine is already running")]
    AlreadyRunning,

    /// `stop` was called from the scan thread it would have to join.
    #[error("stop called from within the scan thread")]
    Reentrant,
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl WatcherError {
    /// Create a root-unreadable error.
    pub fn root_unreadable(root: &Path, reason: impl ToString) -> Self {
        Self::RootUnreadable {
            root: root.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an entry-read error.
    pub fn entry_read(path: &Path, reason: impl ToString) -> Self {
        Self::EntryRead {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}
