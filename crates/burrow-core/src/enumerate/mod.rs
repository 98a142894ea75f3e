//! Lazy enumeration.
//!
//! [`FileInfoIter`] is the public sequence of a search. It dispatches to the
//! single-level enumerator for `TopDirectoryOnly` and to the tree engine for
//! the three recursive orders. [`FilePathIter`] projects it onto paths.
//!
//! Both iterators are forward-only and single-consumption. Pulling stops
//! cooperatively; dropping the iterator, or calling `close`, releases every
//! native handle it holds.

mod level;
mod state;
mod tree;

pub use level::LevelEnumerator;
pub use tree::TreeEnumerator;

use crate::backend::ScanBackend;
use crate::error::Result;
use crate::spec::SearchSpec;
use crate::types::{FileFindInfo, SearchOrder};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
enum Walk {
    Level(LevelEnumerator),
    Tree(TreeEnumerator),
}

/// Lazy sequence of [`FileFindInfo`] for one search.
#[derive(Debug)]
pub struct FileInfoIter {
    walk: Walk,
}

impl FileInfoIter {
    /// Create the traversal matching the order of `spec`.
    ///
    /// Nothing is opened until the first element is pulled.
    pub fn new(spec: SearchSpec, backend: Arc<dyn ScanBackend>) -> Self {
        let walk = match spec.order() {
            SearchOrder::TopDirectoryOnly => Walk::Level(LevelEnumerator::new(spec, backend)),
            _ => Walk::Tree(TreeEnumerator::new(spec, backend)),
        };
        FileInfoIter { walk }
    }

    pub fn spec(&self) -> &SearchSpec {
        match &self.walk {
            Walk::Level(level) => level.spec(),
            Walk::Tree(tree) => tree.spec(),
        }
    }

    /// Release every handle and restart from the search root.
    pub fn reset(&mut self) {
        match &mut self.walk {
            Walk::Level(level) => level.reset(),
            Walk::Tree(tree) => tree.reset(),
        }
    }

    /// Release every handle; nothing more is yielded.
    pub fn close(&mut self) {
        match &mut self.walk {
            Walk::Level(level) => level.close(),
            Walk::Tree(tree) => tree.close(),
        }
    }

    /// Project the sequence onto full paths.
    pub fn paths(self) -> FilePathIter {
        FilePathIter { inner: self }
    }
}

impl Iterator for FileInfoIter {
    type Item = Result<FileFindInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.walk {
            Walk::Level(level) => level.next(),
            Walk::Tree(tree) => tree.next(),
        }
    }
}

impl std::iter::FusedIterator for FileInfoIter {}

/// Lazy sequence of full paths for one search.
#[derive(Debug)]
pub struct FilePathIter {
    inner: FileInfoIter,
}

impl FilePathIter {
    pub fn spec(&self) -> &SearchSpec {
        self.inner.spec()
    }

    /// Release every handle and restart from the search root.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Release every handle; nothing more is yielded.
    pub fn close(&mut self) {
        self.inner.close();
    }
}

impl Iterator for FilePathIter {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|r| r.map(|info| info.full_path))
    }
}

impl std::iter::FusedIterator for FilePathIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use crate::types::ErrorPolicy;
    use std::path::Path;

    fn example() -> Arc<MemoryBackend> {
        let backend = MemoryBackend::new();
        backend
            .add_file("/r/a.txt", 1)
            .add_file("/r/b.log", 2)
            .add_file("/r/d/c.txt", 3);
        Arc::new(backend)
    }

    fn names(iter: FileInfoIter) -> Vec<String> {
        iter.map(|r| r.unwrap().name).collect()
    }

    #[test]
    fn test_top_directory_only_never_leaves_root() {
        let backend = example();
        let spec =
            SearchSpec::new("/r", "*", true, true, SearchOrder::TopDirectoryOnly, true).unwrap();
        let iter = FileInfoIter::new(spec, backend.clone());
        for info in iter {
            assert_eq!(info.unwrap().full_path.parent(), Some(Path::new("/r")));
        }
        assert_eq!(backend.total_opens(), 1);
    }

    #[test]
    fn test_example_tree() {
        let backend = example();

        let spec =
            SearchSpec::new("/r", "*.txt", true, false, SearchOrder::TopDirectoryOnly, true).unwrap();
        assert_eq!(names(FileInfoIter::new(spec, backend.clone())), vec!["a.txt"]);

        let spec =
            SearchSpec::new("/r", "*", true, false, SearchOrder::AllDirectories, true).unwrap();
        assert_eq!(
            names(FileInfoIter::new(spec, backend.clone())),
            vec!["a.txt", "b.log", "c.txt"]
        );
    }

    #[test]
    fn test_paths_projection() {
        let backend = example();
        let spec =
            SearchSpec::new("/r", "*.txt", true, false, SearchOrder::AllDirectories, true).unwrap();
        let paths: Vec<PathBuf> = FileInfoIter::new(spec, backend.clone())
            .paths()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(
            paths,
            vec![Path::new("/r").join("a.txt"), Path::new("/r/d").join("c.txt")]
        );
    }

    #[test]
    fn test_close_and_reset() {
        let backend = example();
        for order in SearchOrder::ALL {
            let spec = SearchSpec::new("/r", "*", true, true, order, true)
                .unwrap()
                .with_error_policy(ErrorPolicy::Skip);
            let mut paths = FileInfoIter::new(spec, backend.clone()).paths();
            let first = paths.next().unwrap().unwrap();
            assert_eq!(backend.open_handles(), 1);

            paths.reset();
            assert_eq!(backend.open_handles(), 0);
            assert_eq!(paths.next().unwrap().unwrap(), first);

            paths.close();
            assert_eq!(backend.open_handles(), 0);
            assert!(paths.next().is_none());
        }
    }

    #[test]
    fn test_iterators_are_send() {
        fn assert_send<T: Send>() {}
        assert_send::<FileInfoIter>();
        assert_send::<FilePathIter>();
    }
}
