//! Filesystem access layer.
//!
//! The scan loop only ever lists one directory at a time and opens files it
//! is about to deliver. Both go through [`FileSystem`] so tests and embedders
//! can substitute their own storage.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Kind of a directory entry, as seen without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link (never followed).
    Symlink,
    /// Sockets, fifos, devices.
    Other,
}

/// A single entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Full path of the entry.
    pub path: PathBuf,
    /// What the entry is.
    pub kind: EntryKind,
}

impl DirEntry {
    /// Create a new entry.
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Capability the scan loop uses to reach the filesystem.
pub trait FileSystem: Send + Sync {
    /// Whether `path` is a directory. Symlinks are resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` does not exist or cannot be inspected.
    fn is_dir(&self, path: &Path) -> io::Result<bool>;

    /// List the immediate children of `path`.
    ///
    /// The outer error means the directory itself could not be listed. Inner
    /// errors are per-entry failures that the caller may skip.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be opened.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<io::Result<DirEntry>>>;

    /// Open a file for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>>;
}

/// [`FileSystem`] backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    /// Create a new OS filesystem handle.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FileSystem for OsFileSystem {
    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        std::fs::metadata(path).map(|m| m.is_dir())
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<io::Result<DirEntry>>> {
        let walker = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        let mut entries = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    let ft = entry.file_type();
                    let kind = if ft.is_symlink() {
                        EntryKind::Symlink
                    } else if ft.is_dir() {
                        EntryKind::Directory
                    } else if ft.is_file() {
                        EntryKind::File
                    } else {
                        EntryKind::Other
                    };
                    entries.push(Ok(DirEntry::new(entry.into_path(), kind)));
                }
                // Depth 0 errors come from opening `path` itself.
                Err(e) if e.depth() == 0 => return Err(io::Error::from(e)),
                Err(e) => entries.push(Err(io::Error::from(e))),
            }
        }

        Ok(entries)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(File::open(path)?))
    }
}
