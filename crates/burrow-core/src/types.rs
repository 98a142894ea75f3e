//! Core data types for Burrow.
//!
//! This module defines the values that flow through a search:
//!
//! - **SearchOrder**: how (and whether) sub-directories are visited
//! - **ErrorPolicy**: what a multi-level walk does when a sub-directory fails
//! - **EntryKind**: which kinds of entries a search returns
//! - **FileAttributes**: platform-neutral attribute bits of a scanned entry
//! - **FileFindInfo**: the record yielded for every matching entry

use crate::error::{BurrowError, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How sub-directories of the search root are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchOrder {
    /// Only the root directory is scanned
    #[default]
    TopDirectoryOnly = 0,

    /// Breadth-first by arrival: every real sub-directory is queued
    AllDirectories = 1,

    /// Depth-first: each sub-directory is finished before its siblings resume
    AllSubdirectories = 2,

    /// Breadth-first, descending only into directories that match the pattern
    AllDepths = 3,
}

impl SearchOrder {
    /// All orders, in discriminant order
    pub const ALL: [SearchOrder; 4] = [
        SearchOrder::TopDirectoryOnly,
        SearchOrder::AllDirectories,
        SearchOrder::AllSubdirectories,
        SearchOrder::AllDepths,
    ];

    /// Convert a numeric discriminant, rejecting unknown values.
    pub fn from_index(index: u8) -> Result<Self> {
        SearchOrder::ALL
            .get(index as usize)
            .copied()
            .ok_or_else(|| BurrowError::invalid_argument(format!("unknown search order {}", index)))
    }

    /// Returns true if sub-directories are visited at all
    pub fn is_recursive(&self) -> bool {
        !matches!(self, SearchOrder::TopDirectoryOnly)
    }

    /// The kebab-case name used in configuration and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchOrder::TopDirectoryOnly => "top-directory-only",
            SearchOrder::AllDirectories => "all-directories",
            SearchOrder::AllSubdirectories => "all-subdirectories",
            SearchOrder::AllDepths => "all-depths",
        }
    }
}

impl fmt::Display for SearchOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchOrder {
    type Err = BurrowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "top" | "top-directory-only" => Ok(SearchOrder::TopDirectoryOnly),
            "all" | "all-directories" => Ok(SearchOrder::AllDirectories),
            "depth" | "all-subdirectories" => Ok(SearchOrder::AllSubdirectories),
            "depths" | "all-depths" => Ok(SearchOrder::AllDepths),
            other => other
                .parse::<u8>()
                .map_err(|_| BurrowError::invalid_argument(format!("unknown search order: {}", s)))
                .and_then(SearchOrder::from_index),
        }
    }
}

/// What a multi-level walk does when a discovered sub-directory cannot be
/// opened or read.
///
/// Failures on the search root always surface, whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Yield the error once and end the walk
    #[default]
    Abort,

    /// Log a warning, drop the failing sub-directory and keep walking
    Skip,
}

impl FromStr for ErrorPolicy {
    type Err = BurrowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(ErrorPolicy::Abort),
            "skip" => Ok(ErrorPolicy::Skip),
            _ => Err(BurrowError::invalid_argument(format!(
                "unknown error policy: {}",
                s
            ))),
        }
    }
}

/// Which kinds of entries a search returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Files,
    Directories,
    All,
}

impl EntryKind {
    /// The `(include_files, include_dirs)` pair for this kind
    pub fn flags(self) -> (bool, bool) {
        match self {
            EntryKind::Files => (true, false),
            EntryKind::Directories => (false, true),
            EntryKind::All => (true, true),
        }
    }
}

/// Attribute bits of a scanned entry.
///
/// The bit values follow the Windows `FILE_ATTRIBUTE_*` constants so native
/// data can be carried through unchanged; Unix backends synthesize the same
/// bits from `lstat` results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileAttributes(pub u32);

impl FileAttributes {
    pub const READONLY: FileAttributes = FileAttributes(0x0001);
    pub const HIDDEN: FileAttributes = FileAttributes(0x0002);
    pub const SYSTEM: FileAttributes = FileAttributes(0x0004);
    pub const DIRECTORY: FileAttributes = FileAttributes(0x0010);
    pub const ARCHIVE: FileAttributes = FileAttributes(0x0020);
    pub const NORMAL: FileAttributes = FileAttributes(0x0080);
    pub const REPARSE_POINT: FileAttributes = FileAttributes(0x0400);

    /// Get the raw attribute bits
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Returns true if every bit of `other` is set
    pub fn contains(&self, other: FileAttributes) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_directory(&self) -> bool {
        self.contains(Self::DIRECTORY)
    }

    pub fn is_reparse_point(&self) -> bool {
        self.contains(Self::REPARSE_POINT)
    }
}

impl std::ops::BitOr for FileAttributes {
    type Output = FileAttributes;

    fn bitor(self, rhs: FileAttributes) -> FileAttributes {
        FileAttributes(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for FileAttributes {
    fn bitor_assign(&mut self, rhs: FileAttributes) {
        self.0 |= rhs.0;
    }
}

/// A single file-system entry produced by a search.
///
/// Records are fresh values built from one native scan result; they hold no
/// handle and can outlive the enumeration that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFindInfo {
    /// Full path: the scanned directory joined with `name`
    pub full_path: PathBuf,

    /// Entry name as stored on disk (e.g., "document.txt"), lossily
    /// converted to UTF-8; `file_name` returns the raw form
    pub name: String,

    /// Size in bytes (0 for directories)
    pub size: u64,

    /// Attribute bits reported by the backend
    pub attributes: FileAttributes,

    /// Creation time, if the platform reports one
    pub creation_time_utc: Option<DateTime<Utc>>,

    /// Last access time
    pub last_access_time_utc: Option<DateTime<Utc>>,

    /// Last write time
    pub last_write_time_utc: Option<DateTime<Utc>>,
}

impl FileFindInfo {
    pub fn is_directory(&self) -> bool {
        self.attributes.is_directory()
    }

    /// Returns true for symbolic links, junctions and other redirections.
    ///
    /// Reparse-point directories are never descended into.
    pub fn is_reparse_point(&self) -> bool {
        self.attributes.is_reparse_point()
    }

    pub fn path(&self) -> &Path {
        &self.full_path
    }

    /// The entry name exactly as the backend reported it.
    pub fn file_name(&self) -> &OsStr {
        self.full_path
            .file_name()
            .unwrap_or_else(|| OsStr::new(&self.name))
    }

    pub fn creation_time(&self) -> Option<DateTime<Local>> {
        self.creation_time_utc.map(|t| t.with_timezone(&Local))
    }

    pub fn last_access_time(&self) -> Option<DateTime<Local>> {
        self.last_access_time_utc.map(|t| t.with_timezone(&Local))
    }

    pub fn last_write_time(&self) -> Option<DateTime<Local>> {
        self.last_write_time_utc.map(|t| t.with_timezone(&Local))
    }

    /// Returns true if this entry is a real directory that may be walked into
    pub(crate) fn is_descendable(&self) -> bool {
        self.is_directory() && !self.is_reparse_point()
    }
}

impl fmt::Display for FileFindInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_path.display())
    }
}
