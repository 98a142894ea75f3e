//! Search entry points.
//!
//! A [`Finder`] binds a [`ScanBackend`] and turns search requests into lazy
//! sequences or fully collected vectors. It is cheap to clone and holds no
//! state between searches.

use crate::backend::ScanBackend;
use crate::enumerate::{FileInfoIter, FilePathIter};
use crate::error::Result;
use crate::spec::SearchSpec;
use crate::types::{EntryKind, FileFindInfo, SearchOrder};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Factory for enumerations over one backend.
#[derive(Clone)]
pub struct Finder {
    backend: Arc<dyn ScanBackend>,
}

impl std::fmt::Debug for Finder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Finder")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl Finder {
    pub fn new(backend: Arc<dyn ScanBackend>) -> Self {
        Finder { backend }
    }

    pub fn backend(&self) -> &Arc<dyn ScanBackend> {
        &self.backend
    }

    /// Lazy sequence of entry records for `spec`.
    pub fn infos(&self, spec: SearchSpec) -> FileInfoIter {
        debug!(
            root = %spec.path().display(),
            pattern = spec.pattern(),
            order = %spec.order(),
            backend = self.backend.name(),
            "Starting search"
        );
        FileInfoIter::new(spec, Arc::clone(&self.backend))
    }

    /// Lazy sequence of full paths for `spec`.
    pub fn paths(&self, spec: SearchSpec) -> FilePathIter {
        self.infos(spec).paths()
    }

    /// Drain the record sequence for `spec`.
    ///
    /// On failure every handle is released before the first error is
    /// returned.
    pub fn collect_infos(&self, spec: SearchSpec) -> Result<Vec<FileFindInfo>> {
        self.infos(spec).collect()
    }

    /// Drain the path sequence for `spec`.
    pub fn collect_paths(&self, spec: SearchSpec) -> Result<Vec<PathBuf>> {
        self.paths(spec).collect()
    }

    /// Lazy glob search for one kind of entry.
    pub fn enumerate(
        &self,
        path: impl AsRef<Path>,
        pattern: &str,
        kind: EntryKind,
        order: SearchOrder,
        ignore_case: bool,
    ) -> Result<FilePathIter> {
        let spec = SearchSpec::for_kind(path.as_ref(), pattern, kind, order, ignore_case)?;
        Ok(self.paths(spec))
    }

    pub fn enumerate_files(
        &self,
        path: impl AsRef<Path>,
        pattern: &str,
        order: SearchOrder,
        ignore_case: bool,
    ) -> Result<FilePathIter> {
        self.enumerate(path, pattern, EntryKind::Files, order, ignore_case)
    }

    pub fn enumerate_directories(
        &self,
        path: impl AsRef<Path>,
        pattern: &str,
        order: SearchOrder,
        ignore_case: bool,
    ) -> Result<FilePathIter> {
        self.enumerate(path, pattern, EntryKind::Directories, order, ignore_case)
    }

    pub fn enumerate_entries(
        &self,
        path: impl AsRef<Path>,
        pattern: &str,
        order: SearchOrder,
        ignore_case: bool,
    ) -> Result<FilePathIter> {
        self.enumerate(path, pattern, EntryKind::All, order, ignore_case)
    }

    /// Lazy regex search for one kind of entry.
    ///
    /// The expression is matched against entry names as given;
    /// `ignore_case` states whether it folds case.
    pub fn enumerate_regex(
        &self,
        path: impl AsRef<Path>,
        regex: Regex,
        kind: EntryKind,
        order: SearchOrder,
        ignore_case: bool,
    ) -> Result<FilePathIter> {
        let (include_files, include_dirs) = kind.flags();
        let spec = SearchSpec::with_regex(
            path.as_ref(),
            regex,
            include_files,
            include_dirs,
            order,
            ignore_case,
        )?;
        Ok(self.paths(spec))
    }

    pub fn get_files(
        &self,
        path: impl AsRef<Path>,
        pattern: &str,
        order: SearchOrder,
        ignore_case: bool,
    ) -> Result<Vec<PathBuf>> {
        self.enumerate_files(path, pattern, order, ignore_case)?.collect()
    }

    pub fn get_directories(
        &self,
        path: impl AsRef<Path>,
        pattern: &str,
        order: SearchOrder,
        ignore_case: bool,
    ) -> Result<Vec<PathBuf>> {
        self.enumerate_directories(path, pattern, order, ignore_case)?
            .collect()
    }

    pub fn get_entries(
        &self,
        path: impl AsRef<Path>,
        pattern: &str,
        order: SearchOrder,
        ignore_case: bool,
    ) -> Result<Vec<PathBuf>> {
        self.enumerate_entries(path, pattern, order, ignore_case)?
            .collect()
    }

    /// Collected regex search for one kind of entry.
    pub fn get_regex(
        &self,
        path: impl AsRef<Path>,
        regex: Regex,
        kind: EntryKind,
        order: SearchOrder,
        ignore_case: bool,
    ) -> Result<Vec<PathBuf>> {
        self.enumerate_regex(path, regex, kind, order, ignore_case)?.collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use std::collections::BTreeSet;

    fn finder() -> (Finder, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .add_file("/r/a.txt", 1)
            .add_file("/r/b.log", 2)
            .add_file("/r/d/c.txt", 3)
            .add_file("/r/d/x/A.TXT", 4);
        (Finder::new(backend.clone()), backend)
    }

    fn p(path: &str) -> PathBuf {
        Path::new(path).components().collect()
    }

    #[test]
    fn test_get_files() {
        let (finder, _) = finder();
        let files = finder
            .get_files("/r", "*.txt", SearchOrder::AllDirectories, true)
            .unwrap();
        assert_eq!(files, vec![p("/r/a.txt"), p("/r/d/c.txt"), p("/r/d/x/A.TXT")]);

        let files = finder
            .get_files("/r", "*.txt", SearchOrder::AllDirectories, false)
            .unwrap();
        assert_eq!(files, vec![p("/r/a.txt"), p("/r/d/c.txt")]);
    }

    #[test]
    fn test_get_directories_and_entries() {
        let (finder, _) = finder();
        let dirs = finder
            .get_directories("/r", "*", SearchOrder::AllSubdirectories, true)
            .unwrap();
        assert_eq!(dirs, vec![p("/r/d"), p("/r/d/x")]);

        let entries = finder
            .get_entries("/r", "*", SearchOrder::TopDirectoryOnly, true)
            .unwrap();
        assert_eq!(entries, vec![p("/r/a.txt"), p("/r/b.log"), p("/r/d")]);
    }

    #[test]
    fn test_collected_matches_lazy_order() {
        let (finder, _) = finder();
        for order in SearchOrder::ALL {
            let spec = SearchSpec::new("/r", "*", true, true, order, true).unwrap();
            let lazy: Vec<PathBuf> = finder.paths(spec.clone()).map(|r| r.unwrap()).collect();
            let collected = finder.collect_paths(spec.clone()).unwrap();
            assert_eq!(lazy, collected);

            let infos = finder.collect_infos(spec).unwrap();
            let projected: Vec<PathBuf> = infos.into_iter().map(|i| i.full_path).collect();
            assert_eq!(projected, collected);
        }
    }

    #[test]
    fn test_recursive_orders_agree_on_set() {
        let (finder, _) = finder();
        let sets: Vec<BTreeSet<PathBuf>> = [
            SearchOrder::AllDirectories,
            SearchOrder::AllSubdirectories,
            SearchOrder::AllDepths,
        ]
        .into_iter()
        .map(|order| {
            finder
                .get_entries("/r", "*", order, true)
                .unwrap()
                .into_iter()
                .collect()
        })
        .collect();
        assert_eq!(sets[0], sets[1]);
        assert_eq!(sets[1], sets[2]);
    }

    #[test]
    fn test_invalid_requests_fail_before_any_open() {
        let (finder, backend) = finder();
        let err = finder
            .enumerate_files("/r", "*.txt", SearchOrder::AllSubdirectories, true)
            .unwrap_err();
        assert!(err.is_invalid_argument());

        let err = finder
            .get_regex(
                "/r",
                Regex::new("txt$").unwrap(),
                EntryKind::Files,
                SearchOrder::AllSubdirectories,
                false,
            )
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(backend.total_opens(), 0);
    }

    #[test]
    fn test_regex_search() {
        let (finder, _) = finder();
        let found = finder
            .get_regex(
                "/r",
                Regex::new(r"^[ab]\.").unwrap(),
                EntryKind::Files,
                SearchOrder::AllDirectories,
                false,
            )
            .unwrap();
        assert_eq!(found, vec![p("/r/a.txt"), p("/r/b.log")]);
    }

    #[test]
    fn test_collect_error_releases_handles() {
        let (finder, backend) = finder();
        backend.deny("/r/d/x");
        let err = finder
            .get_entries("/r", "*", SearchOrder::AllSubdirectories, true)
            .unwrap_err();
        assert!(err.is_permission_denied());
        assert_eq!(backend.open_handles(), 0);
    }

    #[test]
    fn test_missing_root() {
        let (finder, backend) = finder();
        let err = finder
            .get_files("/nope", "*", SearchOrder::AllDirectories, true)
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(backend.open_handles(), 0);
    }
}
