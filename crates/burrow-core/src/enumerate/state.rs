//! Frontier states of a multi-level walk.

use super::level::LevelEnumerator;
use crate::backend::ScanBackend;
use crate::spec::SearchSpec;
use std::path::Path;
use std::sync::Arc;

/// One directory waiting to be, or being, enumerated.
///
/// A state owns its level enumerator and therefore its native handle. Queued
/// states have never been advanced and hold only their rebound spec.
#[derive(Debug)]
pub(crate) struct EnumerationState {
    pub(crate) level: LevelEnumerator,
    /// Distance from the search root (0 for the root itself)
    pub(crate) depth: usize,
    /// Sub-directories discovered while listing this directory
    pub(crate) subdir_count: usize,
}

impl EnumerationState {
    pub(crate) fn root(spec: SearchSpec, backend: Arc<dyn ScanBackend>) -> Self {
        EnumerationState {
            level: LevelEnumerator::new(spec, backend),
            depth: 0,
            subdir_count: 0,
        }
    }

    /// Create the state for a sub-directory discovered by this one.
    pub(crate) fn descend(&mut self, path: &Path, backend: Arc<dyn ScanBackend>) -> Self {
        self.subdir_count += 1;
        EnumerationState {
            level: LevelEnumerator::new(self.level.spec().derive(path), backend),
            depth: self.depth + 1,
            subdir_count: 0,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        self.level.spec().path()
    }
}
