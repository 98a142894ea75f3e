//! In-memory scan backend.
//!
//! Used for testing and for callers that want to run searches over a
//! synthetic tree. Besides files and directories it models directory links
//! (reparse points), directories that refuse to open, directories whose
//! listing fails part-way, and removal while a walk is in progress. Every
//! open handle is accounted for, so resource behaviour can be asserted.

use crate::backend::{RawEntry, ScanBackend, ScanHandle, ScanRequest};
use crate::types::FileAttributes;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Entry in the memory tree.
#[derive(Debug, Clone)]
struct Node {
    attributes: FileAttributes,
    size: u64,
    /// Child names in insertion order (directories only)
    children: Vec<OsString>,
}

impl Node {
    fn directory() -> Self {
        Node {
            attributes: FileAttributes::DIRECTORY,
            size: 0,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct HandleCounters {
    open: AtomicUsize,
    peak: AtomicUsize,
    total: AtomicUsize,
}

/// In-memory directory tree implementing [`ScanBackend`].
///
/// Listings are returned in insertion order, preceded by `.` and `..` like a
/// real directory. Thread-safe via internal `RwLock`s.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    nodes: RwLock<HashMap<PathBuf, Node>>,
    denied: RwLock<HashSet<PathBuf>>,
    broken: RwLock<HashSet<PathBuf>>,
    counters: Arc<HandleCounters>,
}

impl MemoryBackend {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a path: drop `.`, resolve `..`.
    fn normalize(path: &Path) -> PathBuf {
        let mut result = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    result.pop();
                }
                other => result.push(other.as_os_str()),
            }
        }
        result
    }

    fn insert(&self, path: &Path, node: Node) {
        let path = Self::normalize(path);
        let mut nodes = self.nodes.write();
        Self::insert_locked(&mut nodes, path, node);
    }

    fn insert_locked(nodes: &mut HashMap<PathBuf, Node>, path: PathBuf, node: Node) {
        if nodes.contains_key(&path) {
            return;
        }
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            let parent = parent.to_path_buf();
            Self::insert_locked(nodes, parent.clone(), Node::directory());
            if let Some(parent_node) = nodes.get_mut(&parent) {
                parent_node.children.push(name.to_os_string());
            }
        }
        nodes.insert(path, node);
    }

    /// Add a directory (and any missing parents).
    pub fn add_dir(&self, path: impl AsRef<Path>) -> &Self {
        self.insert(path.as_ref(), Node::directory());
        self
    }

    /// Add a file of the given size.
    pub fn add_file(&self, path: impl AsRef<Path>, size: u64) -> &Self {
        self.insert(
            path.as_ref(),
            Node {
                attributes: FileAttributes::ARCHIVE,
                size,
                children: Vec::new(),
            },
        );
        self
    }

    /// Add a link that points at a directory.
    ///
    /// It reports both the directory and reparse-point attributes and lists
    /// as empty.
    pub fn add_dir_link(&self, path: impl AsRef<Path>) -> &Self {
        self.insert(
            path.as_ref(),
            Node {
                attributes: FileAttributes::DIRECTORY | FileAttributes::REPARSE_POINT,
                size: 0,
                children: Vec::new(),
            },
        );
        self
    }

    /// Add a link that points at a file.
    pub fn add_file_link(&self, path: impl AsRef<Path>) -> &Self {
        self.insert(
            path.as_ref(),
            Node {
                attributes: FileAttributes::REPARSE_POINT,
                size: 0,
                children: Vec::new(),
            },
        );
        self
    }

    /// Make opening `path` fail with `PermissionDenied`.
    pub fn deny(&self, path: impl AsRef<Path>) -> &Self {
        self.denied.write().insert(Self::normalize(path.as_ref()));
        self
    }

    /// Make the listing of `path` fail after its relative entries.
    pub fn break_listing(&self, path: impl AsRef<Path>) -> &Self {
        self.broken.write().insert(Self::normalize(path.as_ref()));
        self
    }

    /// Remove `path` and everything beneath it.
    pub fn remove(&self, path: impl AsRef<Path>) -> &Self {
        let path = Self::normalize(path.as_ref());
        let mut nodes = self.nodes.write();
        nodes.retain(|key, _| !key.starts_with(&path));
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            if let Some(parent_node) = nodes.get_mut(parent) {
                parent_node.children.retain(|child| child != name);
            }
        }
        self
    }

    /// Number of handles currently open
    pub fn open_handles(&self) -> usize {
        self.counters.open.load(Ordering::SeqCst)
    }

    /// Largest number of handles that were open at the same time
    pub fn peak_open_handles(&self) -> usize {
        self.counters.peak.load(Ordering::SeqCst)
    }

    /// Number of successful open calls so far
    pub fn total_opens(&self) -> usize {
        self.counters.total.load(Ordering::SeqCst)
    }
}

impl ScanBackend for MemoryBackend {
    fn open(&self, request: &ScanRequest<'_>) -> io::Result<Box<dyn ScanHandle>> {
        let dir = Self::normalize(request.dir);

        if self.denied.read().contains(&dir) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("access denied: {}", dir.display()),
            ));
        }

        let nodes = self.nodes.read();
        let node = nodes.get(&dir).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", dir.display()),
            )
        })?;
        if !node.attributes.is_directory() {
            return Err(io::Error::other(format!(
                "not a directory: {}",
                dir.display()
            )));
        }

        let mut entries = vec![
            RawEntry::new(".", FileAttributes::DIRECTORY),
            RawEntry::new("..", FileAttributes::DIRECTORY),
        ];
        for name in &node.children {
            if let Some(child) = nodes.get(&dir.join(name)) {
                if request.directories_only && !child.attributes.is_directory() {
                    continue;
                }
                entries.push(RawEntry::new(name.clone(), child.attributes).with_size(child.size));
            }
        }

        let counters = Arc::clone(&self.counters);
        let open = counters.open.fetch_add(1, Ordering::SeqCst) + 1;
        counters.peak.fetch_max(open, Ordering::SeqCst);
        counters.total.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MemoryHandle {
            entries: entries.into_iter(),
            yielded: 0,
            broken: self.broken.read().contains(&dir),
            counters,
        }))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Open listing over a snapshot of one directory.
struct MemoryHandle {
    entries: std::vec::IntoIter<RawEntry>,
    yielded: usize,
    broken: bool,
    counters: Arc<HandleCounters>,
}

impl ScanHandle for MemoryHandle {
    fn next_entry(&mut self) -> io::Result<Option<RawEntry>> {
        // The first two entries are always `.` and `..`
        if self.broken && self.yielded >= 2 {
            return Err(io::Error::other("listing failed"));
        }
        self.yielded += 1;
        Ok(self.entries.next())
    }
}

impl Drop for MemoryHandle {
    fn drop(&mut self) {
        self.counters.open.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(backend: &MemoryBackend, dir: &str) -> io::Result<Vec<String>> {
        let request = ScanRequest {
            dir: Path::new(dir),
            pattern: "*",
            directories_only: false,
            case_sensitive: false,
        };
        let mut handle = backend.open(&request)?;
        let mut names = Vec::new();
        while let Some(entry) = handle.next_entry()? {
            names.push(entry.name.to_string_lossy().into_owned());
        }
        Ok(names)
    }

    #[test]
    fn test_listing_in_insertion_order() {
        let backend = MemoryBackend::new();
        backend
            .add_file("/r/b.log", 2)
            .add_file("/r/a.txt", 1)
            .add_dir("/r/d");

        assert_eq!(list(&backend, "/r").unwrap(), vec![".", "..", "b.log", "a.txt", "d"]);
        assert_eq!(list(&backend, "/r/d").unwrap(), vec![".", ".."]);
    }

    #[test]
    fn test_parents_are_created() {
        let backend = MemoryBackend::new();
        backend.add_file("/r/x/y/z.txt", 0);
        assert_eq!(list(&backend, "/r/x").unwrap(), vec![".", "..", "y"]);
    }

    #[test]
    fn test_open_failures() {
        let backend = MemoryBackend::new();
        backend.add_dir("/r/locked").add_file("/r/file", 0).deny("/r/locked");

        let err = list(&backend, "/r/missing").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        let err = list(&backend, "/r/locked").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);

        assert!(list(&backend, "/r/file").is_err());
        assert_eq!(backend.open_handles(), 0);
    }

    #[test]
    fn test_handle_accounting() {
        let backend = MemoryBackend::new();
        backend.add_dir("/r/a");

        let request = ScanRequest {
            dir: Path::new("/r"),
            pattern: "*",
            directories_only: false,
            case_sensitive: false,
        };
        let first = backend.open(&request).unwrap();
        let second = backend.open(&request).unwrap();
        assert_eq!(backend.open_handles(), 2);
        drop(first);
        drop(second);
        assert_eq!(backend.open_handles(), 0);
        assert_eq!(backend.peak_open_handles(), 2);
        assert_eq!(backend.total_opens(), 2);
    }

    #[test]
    fn test_remove_subtree() {
        let backend = MemoryBackend::new();
        backend.add_file("/r/d/c.txt", 0).add_file("/r/a.txt", 0);
        backend.remove("/r/d");

        assert_eq!(list(&backend, "/r").unwrap(), vec![".", "..", "a.txt"]);
        assert!(list(&backend, "/r/d").is_err());
    }

    #[test]
    fn test_broken_listing() {
        let backend = MemoryBackend::new();
        backend.add_file("/r/a.txt", 0).break_listing("/r");
        assert!(list(&backend, "/r").is_err());
        assert_eq!(backend.open_handles(), 0);
    }
}
