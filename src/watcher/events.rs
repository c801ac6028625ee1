//! Delivery types handed to user callbacks.

use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::WatcherError;

/// Callback invoked once per newly detected file.
///
/// An `Err` is logged and counted; it never stops delivery of the other
/// files in the same tick.
pub type Handler = Arc<dyn Fn(DetectedFile) -> anyhow::Result<()> + Send + Sync>;

/// Callback invoked when a root cannot be scanned during a tick.
pub type ErrorHook = Arc<dyn Fn(&WatcherError) + Send + Sync>;

/// A newly detected file, opened for reading.
pub struct DetectedFile {
    root: PathBuf,
    path: PathBuf,
    reader: Box<dyn Read + Send>,
}

impl DetectedFile {
    /// Wrap an opened reader.
    #[must_use]
    pub fn new(root: PathBuf, path: PathBuf, reader: Box<dyn Read + Send>) -> Self {
        Self { root, path, reader }
    }

    /// Configured root the file was found under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path relative to its root.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        self.path.strip_prefix(&self.root).unwrap_or(self.path.as_path())
    }

    /// Consume the handle and return the path.
    #[must_use]
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

impl Read for DetectedFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl fmt::Debug for DetectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectedFile")
            .field("root", &self.root)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn detected(contents: &str) -> DetectedFile {
        DetectedFile::new(
            PathBuf::from("/inbox"),
            PathBuf::from("/inbox/2024/report.csv"),
            Box::new(Cursor::new(contents.as_bytes().to_vec())),
        )
    }

    #[test]
    fn test_detected_file_paths() {
        let file = detected("");
        assert_eq!(file.root(), Path::new("/inbox"));
        assert_eq!(file.path(), Path::new("/inbox/2024/report.csv"));
        assert_eq!(file.relative_path(), Path::new("2024/report.csv"));
        assert_eq!(file.into_path(), PathBuf::from("/inbox/2024/report.csv"));
    }

    #[test]
    fn test_detected_file_reads_contents() {
        let mut file = detected("a,b\n1,2\n");
        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "a,b\n1,2\n");
    }

    #[test]
    fn test_detected_file_debug() {
        let debug = format!("{:?}", detected(""));
        assert!(debug.contains("report.csv"));
        assert!(debug.contains("DetectedFile"));
    }
}
