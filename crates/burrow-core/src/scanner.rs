//! Single-directory scanning.
//!
//! A [`DirectoryScanner`] owns at most one native listing handle for one
//! directory. The handle is opened lazily on the first [`advance`], closed as
//! soon as the listing is exhausted or fails, and released exactly once on
//! every path: `close`, reset, or drop.
//!
//! [`advance`]: DirectoryScanner::advance

use crate::backend::{RawEntry, ScanBackend, ScanHandle, ScanRequest};
use crate::error::{BurrowError, Result};
use crate::spec::SearchSpec;
use crate::types::FileFindInfo;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Not opened yet (or reset)
    Idle,
    /// Handle is open
    Open,
    /// Listing ended or failed; the handle has been released
    Done,
}

/// Scanner over the entries of one directory.
pub struct DirectoryScanner {
    backend: Arc<dyn ScanBackend>,
    dir: PathBuf,
    pattern: String,
    directories_only: bool,
    case_sensitive: bool,
    handle: Option<Box<dyn ScanHandle>>,
    state: ScanState,
}

impl std::fmt::Debug for DirectoryScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryScanner")
            .field("backend", &self.backend.name())
            .field("dir", &self.dir)
            .field("pattern", &self.pattern)
            .field("state", &self.state)
            .finish()
    }
}

impl DirectoryScanner {
    /// Create a scanner for the directory named by `spec`.
    ///
    /// No native call is made until the first advance.
    pub fn new(spec: &SearchSpec, backend: Arc<dyn ScanBackend>) -> Self {
        DirectoryScanner {
            backend,
            dir: spec.path().to_path_buf(),
            pattern: spec.native_pattern().to_string(),
            directories_only: !spec.include_files(),
            case_sensitive: !spec.ignore_case(),
            handle: None,
            state: ScanState::Idle,
        }
    }

    /// Create a scanner that lists every entry of `dir`.
    pub fn unfiltered(dir: impl Into<PathBuf>, backend: Arc<dyn ScanBackend>) -> Self {
        DirectoryScanner {
            backend,
            dir: dir.into(),
            pattern: crate::pattern::MATCH_ALL.to_string(),
            directories_only: false,
            case_sensitive: false,
            handle: None,
            state: ScanState::Idle,
        }
    }

    /// Use `pattern` as the native pattern hint for the next open.
    pub(crate) fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = pattern.to_string();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns true while a native handle is held
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Returns true once the listing has ended
    pub fn is_finished(&self) -> bool {
        self.state == ScanState::Done
    }

    /// Issue the native open call.
    ///
    /// Does nothing if the scanner is already open or finished.
    pub fn open(&mut self) -> Result<()> {
        if self.state != ScanState::Idle {
            return Ok(());
        }

        let request = ScanRequest {
            dir: &self.dir,
            pattern: &self.pattern,
            directories_only: self.directories_only,
            case_sensitive: self.case_sensitive,
        };
        match self.backend.open(&request) {
            Ok(handle) => {
                trace!(dir = %self.dir.display(), backend = self.backend.name(), "Opened listing");
                self.handle = Some(handle);
                self.state = ScanState::Open;
                Ok(())
            }
            Err(e) => {
                self.state = ScanState::Done;
                Err(BurrowError::from_native(&self.dir, e))
            }
        }
    }

    /// Fetch the next entry other than `.` and `..`.
    ///
    /// Returns `Ok(None)` once the listing is exhausted. The handle is
    /// released before an exhaustion or an error is reported.
    pub fn advance(&mut self) -> Result<Option<FileFindInfo>> {
        self.open()?;

        loop {
            let Some(handle) = self.handle.as_mut() else {
                return Ok(None);
            };
            match handle.next_entry() {
                Ok(Some(raw)) if raw.is_relative() => continue,
                Ok(Some(raw)) => return Ok(Some(self.to_info(raw))),
                Ok(None) => {
                    self.finish();
                    return Ok(None);
                }
                Err(e) => {
                    self.finish();
                    return Err(BurrowError::Native {
                        path: self.dir.clone(),
                        source: e,
                    });
                }
            }
        }
    }

    /// Release the native handle.
    ///
    /// Idempotent, and safe on a scanner that never opened. The next advance
    /// reopens the listing from the start.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            trace!(dir = %self.dir.display(), "Closed listing");
        }
        self.state = ScanState::Idle;
    }

    fn finish(&mut self) {
        self.close();
        self.state = ScanState::Done;
    }

    fn to_info(&self, raw: RawEntry) -> FileFindInfo {
        FileFindInfo {
            full_path: self.dir.join(&raw.name),
            name: raw.name.to_string_lossy().into_owned(),
            size: raw.size,
            attributes: raw.attributes,
            creation_time_utc: raw.created,
            last_access_time_utc: raw.accessed,
            last_write_time_utc: raw.modified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use crate::types::SearchOrder;

    fn backend() -> Arc<MemoryBackend> {
        let backend = MemoryBackend::new();
        backend.add_file("/r/a.txt", 3).add_dir("/r/d");
        Arc::new(backend)
    }

    fn spec(path: &str) -> SearchSpec {
        SearchSpec::new(path, "*", true, true, SearchOrder::TopDirectoryOnly, true).unwrap()
    }

    #[test]
    fn test_opens_lazily_and_skips_relative_entries() {
        let backend = backend();
        let mut scanner = DirectoryScanner::new(&spec("/r"), backend.clone());
        assert!(!scanner.is_open());
        assert_eq!(backend.total_opens(), 0);

        let first = scanner.advance().unwrap().unwrap();
        assert_eq!(first.name, "a.txt");
        assert_eq!(first.size, 3);
        assert_eq!(first.full_path, Path::new("/r").join("a.txt"));
        assert!(scanner.is_open());

        let second = scanner.advance().unwrap().unwrap();
        assert_eq!(second.name, "d");
        assert!(second.is_directory());

        assert!(scanner.advance().unwrap().is_none());
        assert!(scanner.is_finished());
        assert_eq!(backend.open_handles(), 0);
        assert!(scanner.advance().unwrap().is_none());
        assert_eq!(backend.total_opens(), 1);
    }

    #[test]
    fn test_close_is_idempotent() {
        let backend = backend();
        let mut scanner = DirectoryScanner::new(&spec("/r"), backend.clone());
        scanner.close();
        scanner.close();

        scanner.advance().unwrap();
        assert_eq!(backend.open_handles(), 1);
        scanner.close();
        scanner.close();
        assert_eq!(backend.open_handles(), 0);
    }

    #[test]
    fn test_close_restarts_from_zero() {
        let backend = backend();
        let mut scanner = DirectoryScanner::new(&spec("/r"), backend.clone());
        assert_eq!(scanner.advance().unwrap().unwrap().name, "a.txt");
        scanner.close();
        assert_eq!(scanner.advance().unwrap().unwrap().name, "a.txt");
        assert_eq!(backend.total_opens(), 2);
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let backend = backend();
        let mut scanner = DirectoryScanner::new(&spec("/nope"), backend.clone());
        let err = scanner.advance().unwrap_err();
        assert!(err.is_not_found());
        assert!(scanner.is_finished());
        assert_eq!(backend.open_handles(), 0);
    }

    #[test]
    fn test_denied_directory_keeps_native_error() {
        let backend = backend();
        backend.deny("/r/d");
        let mut scanner = DirectoryScanner::new(&spec("/r/d"), backend.clone());
        let err = scanner.advance().unwrap_err();
        assert!(err.is_permission_denied());
    }

    #[test]
    fn test_read_error_releases_handle() {
        let backend = backend();
        backend.break_listing("/r");
        let mut scanner = DirectoryScanner::new(&spec("/r"), backend.clone());
        assert!(scanner.advance().is_err());
        assert!(!scanner.is_open());
        assert_eq!(backend.open_handles(), 0);
    }

    #[test]
    fn test_drop_releases_handle() {
        let backend = backend();
        {
            let mut scanner = DirectoryScanner::new(&spec("/r"), backend.clone());
            scanner.advance().unwrap();
            assert_eq!(backend.open_handles(), 1);
        }
        assert_eq!(backend.open_handles(), 0);
    }
}
