//! Single-level enumeration.
//!
//! [`LevelEnumerator`] turns one [`DirectoryScanner`] into a filtered
//! sequence. On its own it is the whole of `TopDirectoryOnly`; the multi-level
//! walks use it as the per-directory source of candidates.

use crate::backend::ScanBackend;
use crate::error::Result;
use crate::scanner::DirectoryScanner;
use crate::spec::SearchSpec;
use crate::types::FileFindInfo;
use std::sync::Arc;

/// Enumerator over the matching entries of one directory.
#[derive(Debug)]
pub struct LevelEnumerator {
    spec: SearchSpec,
    scanner: DirectoryScanner,
    failed: bool,
}

impl LevelEnumerator {
    pub fn new(spec: SearchSpec, backend: Arc<dyn ScanBackend>) -> Self {
        let scanner = DirectoryScanner::new(&spec, backend);
        LevelEnumerator {
            spec,
            scanner,
            failed: false,
        }
    }

    pub fn spec(&self) -> &SearchSpec {
        &self.spec
    }

    /// Returns true once the directory has been fully listed or has failed
    pub fn is_finished(&self) -> bool {
        self.failed || self.scanner.is_finished()
    }

    /// Returns true while the native handle is held
    pub fn is_open(&self) -> bool {
        self.scanner.is_open()
    }

    /// Pull the next entry the walk has to look at.
    ///
    /// Files pass when files are included. Directories pass when directories
    /// are included or, in the recursive orders, whenever they can be walked
    /// into. The name pattern is not applied here.
    pub(crate) fn next_candidate(&mut self) -> Option<Result<FileFindInfo>> {
        if self.failed {
            return None;
        }
        loop {
            match self.scanner.advance() {
                Ok(Some(info)) if self.admits(&info) => return Some(Ok(info)),
                Ok(Some(_)) => continue,
                Ok(None) => return None,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }

    fn admits(&self, info: &FileFindInfo) -> bool {
        if info.is_directory() {
            self.spec.include_dirs() || (self.spec.order().is_recursive() && info.is_descendable())
        } else {
            self.spec.include_files()
        }
    }

    /// Release the handle and start over from the first entry.
    pub fn reset(&mut self) {
        self.scanner.close();
        self.failed = false;
    }

    /// Release the handle; the enumerator yields nothing more.
    pub fn close(&mut self) {
        self.scanner.close();
        self.failed = true;
    }
}

impl Iterator for LevelEnumerator {
    type Item = Result<FileFindInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.next_candidate()? {
                Ok(info) if self.spec.is_match(&info.name) && self.spec.includes_kind(&info) => {
                    return Some(Ok(info))
                }
                Ok(_) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl std::iter::FusedIterator for LevelEnumerator {}
