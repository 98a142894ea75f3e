//! Multi-level traversal.
//!
//! All three recursive orders share one engine. They differ in two knobs:
//!
//! | Order               | Frontier | Descends into                    |
//! |---------------------|----------|----------------------------------|
//! | `AllDirectories`    | queue    | every real sub-directory         |
//! | `AllSubdirectories` | stack    | every real sub-directory         |
//! | `AllDepths`         | queue    | sub-directories matching pattern |
//!
//! With a queue, discovered directories are appended and visited after
//! everything already pending, so only the directory at the head ever holds
//! an open handle. With a stack, a discovered directory is entered at once
//! and its ancestors keep their handles open until it is exhausted.
//! Reparse points are never descended into.

use super::state::EnumerationState;
use crate::backend::ScanBackend;
use crate::error::Result;
use crate::spec::SearchSpec;
use crate::types::{ErrorPolicy, FileFindInfo, SearchOrder};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Which pending state is processed next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frontier {
    /// First in, first out
    Queue,
    /// Last in, first out
    Stack,
}

impl Frontier {
    fn current(self, states: &mut VecDeque<EnumerationState>) -> Option<&mut EnumerationState> {
        match self {
            Frontier::Queue => states.front_mut(),
            Frontier::Stack => states.back_mut(),
        }
    }

    fn retire(self, states: &mut VecDeque<EnumerationState>) -> Option<EnumerationState> {
        match self {
            Frontier::Queue => states.pop_front(),
            Frontier::Stack => states.pop_back(),
        }
    }
}

/// When a real sub-directory is walked into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recursion {
    Never,
    Always,
    WhenMatched,
}

impl Recursion {
    fn allows(self, matched: bool) -> bool {
        match self {
            Recursion::Never => false,
            Recursion::Always => true,
            Recursion::WhenMatched => matched,
        }
    }
}

/// Enumerator over a directory tree.
///
/// Dropping the enumerator (or calling [`close`](TreeEnumerator::close))
/// releases the handle of every frontier state still open.
pub struct TreeEnumerator {
    spec: SearchSpec,
    backend: Arc<dyn ScanBackend>,
    frontier: Frontier,
    recursion: Recursion,
    states: VecDeque<EnumerationState>,
}

impl std::fmt::Debug for TreeEnumerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeEnumerator")
            .field("spec", &self.spec)
            .field("backend", &self.backend.name())
            .field("frontier", &self.frontier)
            .field("recursion", &self.recursion)
            .field("pending", &self.states.len())
            .finish()
    }
}

impl TreeEnumerator {
    pub fn new(spec: SearchSpec, backend: Arc<dyn ScanBackend>) -> Self {
        let (frontier, recursion) = match spec.order() {
            SearchOrder::TopDirectoryOnly => (Frontier::Queue, Recursion::Never),
            SearchOrder::AllDirectories => (Frontier::Queue, Recursion::Always),
            SearchOrder::AllSubdirectories => (Frontier::Stack, Recursion::Always),
            SearchOrder::AllDepths => (Frontier::Queue, Recursion::WhenMatched),
        };

        let mut states = VecDeque::new();
        states.push_back(EnumerationState::root(spec.clone(), Arc::clone(&backend)));

        TreeEnumerator {
            spec,
            backend,
            frontier,
            recursion,
            states,
        }
    }

    pub fn spec(&self) -> &SearchSpec {
        &self.spec
    }

    /// Number of directories discovered but not yet exhausted
    pub fn pending(&self) -> usize {
        self.states.len()
    }

    /// Number of frontier states currently holding a native handle
    pub fn open_states(&self) -> usize {
        self.states.iter().filter(|s| s.level.is_open()).count()
    }

    /// Release every handle; the enumerator yields nothing more.
    pub fn close(&mut self) {
        if !self.states.is_empty() {
            debug!(
                root = %self.spec.path().display(),
                pending = self.states.len(),
                "Closing traversal"
            );
        }
        self.states.clear();
    }

    /// Release every handle and restart from the search root.
    pub fn reset(&mut self) {
        self.close();
        self.states.push_back(EnumerationState::root(
            self.spec.clone(),
            Arc::clone(&self.backend),
        ));
    }

    fn retire_current(&mut self) {
        if let Some(state) = self.frontier.retire(&mut self.states) {
            debug!(
                dir = %state.path().display(),
                depth = state.depth,
                subdirs = state.subdir_count,
                "Directory exhausted"
            );
        }
    }
}

impl Iterator for TreeEnumerator {
    type Item = Result<FileFindInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let recursion = self.recursion;
            let state = self.frontier.current(&mut self.states)?;

            match state.level.next_candidate() {
                Some(Ok(info)) => {
                    let matched = self.spec.is_match(&info.name);
                    if info.is_descendable() && recursion.allows(matched) {
                        let child = state.descend(&info.full_path, Arc::clone(&self.backend));
                        trace!(dir = %info.full_path.display(), depth = child.depth, "Queued sub-directory");
                        self.states.push_back(child);
                    }
                    if matched && self.spec.includes_kind(&info) {
                        return Some(Ok(info));
                    }
                }
                None => self.retire_current(),
                Some(Err(e)) => {
                    let depth = state.depth;
                    self.retire_current();
                    if depth == 0 || self.spec.error_policy() == ErrorPolicy::Abort {
                        self.close();
                        return Some(Err(e));
                    }
                    warn!(error = %e, depth, "Skipping unreadable directory");
                }
            }
        }
    }
}

impl std::iter::FusedIterator for TreeEnumerator {}
