//! Per-root snapshots of previously seen files.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Files seen per root as of that root's last successful scan.
///
/// A root with no entry has never been scanned: its next diff is a first
/// scan, which either reports everything or seeds silently.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    roots: HashMap<PathBuf, BTreeSet<PathBuf>>,
}

impl SnapshotStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the files in `current` that were absent from the last snapshot
    /// of `root`, and replace that snapshot with `current`.
    ///
    /// On a root's first scan, `ignore_startup` decides whether every file
    /// is reported or none are.
    pub fn diff(
        &mut self,
        root: &Path,
        current: BTreeSet<PathBuf>,
        ignore_startup: bool,
    ) -> Vec<PathBuf> {
        let appeared = match self.roots.get(root) {
            Some(previous) => current.difference(previous).cloned().collect(),
            None if ignore_startup => Vec::new(),
            None => current.iter().cloned().collect(),
        };
        self.roots.insert(root.to_path_buf(), current);
        appeared
    }

    /// Forget snapshots for roots that are no longer configured.
    pub fn retain_roots(&mut self, roots: &[PathBuf]) {
        self.roots.retain(|root, _| roots.contains(root));
    }

    /// Whether `root` has completed at least one scan.
    #[must_use]
    pub fn contains(&self, root: &Path) -> bool {
        self.roots.contains_key(root)
    }

    /// Files last seen for `root`.
    #[must_use]
    pub fn get(&self, root: &Path) -> Option<&BTreeSet<PathBuf>> {
        self.roots.get(root)
    }

    /// Number of roots with a snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether no root has been scanned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
