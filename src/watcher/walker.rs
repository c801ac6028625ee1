//! Depth-limited directory walker.
//!
//! The root is level 0. Files at levels `0..=max_depth` are collected; a
//! subdirectory at level `l` is only listed when `l <= max_depth`. Symlinks
//! are never followed and only regular files are returned.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::fs::{EntryKind, FileSystem};
use crate::error::WatcherError;

/// Result of walking one root.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Walk {
    /// Regular files found, in lexicographic order.
    pub files: BTreeSet<PathBuf>,
    /// Entries skipped because they could not be read.
    pub skipped: u64,
}

impl Walk {
    fn skip(&mut self, err: &WatcherError) {
        tracing::debug!(error = %err, "Skipping unreadable entry");
        self.skipped += 1;
    }
}

/// Walk `root` down to `max_depth` levels and collect regular files.
///
/// # Errors
///
/// Returns [`WatcherError::RootUnreadable`] if the root does not exist, is
/// not a directory, or cannot be listed. Failures below the root are
/// skipped and counted in [`Walk::skipped`].
pub fn walk(fs: &dyn FileSystem, root: &Path, max_depth: u32) -> Result<Walk, WatcherError> {
    match fs.is_dir(root) {
        Ok(true) => {}
        Ok(false) => return Err(WatcherError::root_unreadable(root, "not a directory")),
        Err(e) => return Err(WatcherError::root_unreadable(root, e)),
    }

    let mut walk = Walk::default();
    let mut pending = vec![(root.to_path_buf(), 0u32)];

    while let Some((dir, level)) = pending.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if level == 0 => return Err(WatcherError::root_unreadable(root, e)),
            Err(e) => {
                walk.skip(&WatcherError::entry_read(&dir, e));
                continue;
            }
        };

        for entry in entries {
            match entry {
                Ok(entry) => match entry.kind {
                    EntryKind::File => {
                        walk.files.insert(entry.path);
                    }
                    EntryKind::Directory if level < max_depth => {
                        pending.push((entry.path, level + 1));
                    }
                    EntryKind::Directory | EntryKind::Symlink | EntryKind::Other => {}
                },
                Err(e) => walk.skip(&WatcherError::entry_read(&dir, e)),
            }
        }
    }

    Ok(walk)
}
