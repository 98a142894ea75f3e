//! Directory scan backend traits.
//!
//! This module defines the abstract interface to the native "open listing /
//! next entry / close listing" primitive. Everything above it (scanners,
//! enumerators, point queries) talks to the filesystem only through these
//! traits, which keeps platform-specific and unsafe code in backend crates.
//!
//! ## Implementing a New Backend
//!
//! 1. Implement [`ScanBackend::open`] to start a listing of one directory
//! 2. Return a [`ScanHandle`] that yields one [`RawEntry`] per native call
//! 3. Release the native handle in the handle's `Drop` implementation
//!
//! Backends may treat the pattern, directory-only and case hints of a
//! [`ScanRequest`] as pre-filters or ignore them: the core post-filters every
//! entry anyway.

use crate::types::FileAttributes;
use chrono::{DateTime, Utc};
use std::ffi::OsString;
use std::io;
use std::path::Path;

/// One native "list directory" call.
#[derive(Debug, Clone, Copy)]
pub struct ScanRequest<'a> {
    /// Directory to list
    pub dir: &'a Path,

    /// Name pattern hint (`*` when every entry is wanted)
    pub pattern: &'a str,

    /// Only directories are needed
    pub directories_only: bool,

    /// The pattern hint should be matched case-sensitively
    pub case_sensitive: bool,
}

/// One entry as produced by a native scan call.
///
/// Relative entries (`.` and `..`) are passed through as the platform reports
/// them; the scanner filters them out.
#[derive(Debug, Clone)]
pub struct RawEntry {
    pub name: OsString,
    pub attributes: FileAttributes,
    pub size: u64,
    pub created: Option<DateTime<Utc>>,
    pub accessed: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

impl RawEntry {
    /// Create an entry with no size or timestamps
    pub fn new(name: impl Into<OsString>, attributes: FileAttributes) -> Self {
        RawEntry {
            name: name.into(),
            attributes,
            size: 0,
            created: None,
            accessed: None,
            modified: None,
        }
    }

    /// Set the size
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Set all three timestamps
    pub fn with_times(
        mut self,
        created: Option<DateTime<Utc>>,
        accessed: Option<DateTime<Utc>>,
        modified: Option<DateTime<Utc>>,
    ) -> Self {
        self.created = created;
        self.accessed = accessed;
        self.modified = modified;
        self
    }

    /// Returns true for the `.` and `..` self/parent entries
    pub fn is_relative(&self) -> bool {
        self.name == "." || self.name == ".."
    }
}

/// An open native directory listing.
///
/// Dropping the handle is the native close; it must happen exactly once,
/// which ownership guarantees.
pub trait ScanHandle: Send {
    /// Fetch the next entry, or `None` once the listing is exhausted.
    fn next_entry(&mut self) -> io::Result<Option<RawEntry>>;
}

/// Abstract trait for directory scan backends.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync`: independent enumerations may run on
/// separate threads over the same backend, each with its own handles.
pub trait ScanBackend: Send + Sync {
    /// Open a listing of `request.dir`.
    ///
    /// A missing directory must be reported with `io::ErrorKind::NotFound`;
    /// other failures should keep the OS error code.
    fn open(&self, request: &ScanRequest<'_>) -> io::Result<Box<dyn ScanHandle>>;

    /// Get the backend name for logging
    fn name(&self) -> &'static str;
}
