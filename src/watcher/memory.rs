//! In-memory [`FileSystem`] for tests and embedders.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use super::fs::{DirEntry, EntryKind, FileSystem};

/// Symlink hops followed before giving up on a chain.
const MAX_SYMLINK_HOPS: usize = 40;

#[derive(Debug, Clone)]
enum Node {
    File(Arc<Vec<u8>>),
    Directory,
    Symlink(PathBuf),
}

/// Thread-safe in-memory filesystem.
///
/// Paths are stored exactly as given; use absolute paths throughout.
/// [`MemoryFileSystem::deny`] makes a directory unlistable or a file
/// unopenable, which is how tests exercise per-entry and per-root failures.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    nodes: RwLock<BTreeMap<PathBuf, Node>>,
    denied: RwLock<BTreeSet<PathBuf>>,
}

impl MemoryFileSystem {
    /// Create an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory and all of its missing parents.
    pub fn create_dir_all(&self, path: impl AsRef<Path>) {
        let mut nodes = self.nodes.write();
        insert_parents(&mut nodes, path.as_ref());
        nodes.insert(path.as_ref().to_path_buf(), Node::Directory);
    }

    /// Write a file, creating missing parent directories.
    pub fn write(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut nodes = self.nodes.write();
        if let Some(parent) = path.parent() {
            insert_parents(&mut nodes, parent);
            nodes
                .entry(parent.to_path_buf())
                .or_insert(Node::Directory);
        }
        nodes.insert(path.to_path_buf(), Node::File(Arc::new(contents.into())));
    }

    /// Create a symbolic link at `link` pointing to `target`.
    pub fn symlink(&self, target: impl AsRef<Path>, link: impl AsRef<Path>) {
        let link = link.as_ref();
        let mut nodes = self.nodes.write();
        if let Some(parent) = link.parent() {
            insert_parents(&mut nodes, parent);
            nodes
                .entry(parent.to_path_buf())
                .or_insert(Node::Directory);
        }
        nodes.insert(
            link.to_path_buf(),
            Node::Symlink(target.as_ref().to_path_buf()),
        );
    }

    /// Remove a path and everything below it.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.nodes
            .write()
            .retain(|p, _| p != path && !p.starts_with(path));
    }

    /// Make `path` fail: directories can no longer be listed, files can no
    /// longer be opened.
    pub fn deny(&self, path: impl AsRef<Path>) {
        self.denied.write().insert(path.as_ref().to_path_buf());
    }

    /// Undo [`MemoryFileSystem::deny`].
    pub fn allow(&self, path: impl AsRef<Path>) {
        self.denied.write().remove(path.as_ref());
    }

    /// Whether anything exists at `path`.
    #[must_use]
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.nodes.read().contains_key(path.as_ref())
    }

    fn check_denied(&self, path: &Path) -> io::Result<()> {
        if self.denied.read().contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }
        Ok(())
    }

    /// Resolve symlinks starting at `path` and return the final node.
    fn resolve(&self, path: &Path) -> io::Result<(PathBuf, Node)> {
        let nodes = self.nodes.read();
        let mut current = path.to_path_buf();
        for _ in 0..MAX_SYMLINK_HOPS {
            match nodes.get(&current) {
                Some(Node::Symlink(target)) => current = target.clone(),
                Some(node) => return Ok((current, node.clone())),
                None => return Err(not_found(&current)),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("too many levels of symbolic links: {}", path.display()),
        ))
    }
}

impl FileSystem for MemoryFileSystem {
    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        let (_, node) = self.resolve(path)?;
        Ok(matches!(node, Node::Directory))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<io::Result<DirEntry>>> {
        self.check_denied(path)?;
        let (dir, node) = self.resolve(path)?;
        if !matches!(node, Node::Directory) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a directory: {}", path.display()),
            ));
        }
        self.check_denied(&dir)?;

        let nodes = self.nodes.read();
        let entries = nodes
            .range(dir.clone()..)
            .skip(1)
            .take_while(|(p, _)| p.starts_with(&dir))
            .filter(|(p, _)| p.parent() == Some(dir.as_path()))
            .map(|(p, node)| {
                let kind = match node {
                    Node::File(_) => EntryKind::File,
                    Node::Directory => EntryKind::Directory,
                    Node::Symlink(_) => EntryKind::Symlink,
                };
                // Report children under the path the caller asked for.
                Ok(DirEntry::new(path.join(p.strip_prefix(&dir).unwrap_or(p.as_path())), kind))
            })
            .collect();

        Ok(entries)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        self.check_denied(path)?;
        match self.resolve(path)? {
            (_, Node::File(bytes)) => Ok(Box::new(Cursor::new(bytes.to_vec()))),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file: {}", path.display()),
            )),
        }
    }
}

fn insert_parents(nodes: &mut BTreeMap<PathBuf, Node>, path: &Path) {
    for ancestor in path.ancestors().skip(1) {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        nodes
            .entry(ancestor.to_path_buf())
            .or_insert(Node::Directory);
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file or directory: {}", path.display()),
    )
}
