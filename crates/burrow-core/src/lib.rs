//! # Burrow Core Library
//!
//! This crate provides lazy, pull-based filesystem traversal. It is
//! platform-agnostic: the native "open listing / next entry / close listing"
//! primitive is abstracted behind the [`ScanBackend`] trait and implemented in
//! the `burrow-native` crate.
//!
//! ## Architecture
//!
//! - **Spec** (`spec`): Immutable, validated search requests
//! - **Pattern** (`pattern`): Glob-to-regex translation and name matching
//! - **Backend** (`backend`): The native scan interface
//! - **Scanner** (`scanner`): One directory, at most one open handle
//! - **Enumerate** (`enumerate`): Single-level and tree traversals
//! - **Find** (`find`): Search entry points and collection helpers
//! - **Query** (`query`): Point lookups (exact names, emptiness)
//! - **Config** (`config`): Configuration management
//!
//! ## Example
//!
//! ```rust,ignore
//! use burrow_core::{Finder, SearchOrder};
//!
//! let finder = Finder::new(backend);
//! for path in finder.enumerate_files("/var/log", "*.log", SearchOrder::AllDirectories, true)? {
//!     println!("{}", path?.display());
//! }
//! ```

pub mod backend;
pub mod config;
pub mod enumerate;
pub mod error;
pub mod find;
pub mod memory;
pub mod pattern;
mod query;
pub mod scanner;
pub mod spec;
pub mod types;

// Re-export commonly used types
pub use backend::{RawEntry, ScanBackend, ScanHandle, ScanRequest};
pub use config::{Config, OutputFormat};
pub use enumerate::{FileInfoIter, FilePathIter, LevelEnumerator, TreeEnumerator};
pub use error::{BurrowError, Result};
pub use find::Finder;
pub use memory::MemoryBackend;
pub use pattern::NameMatcher;
pub use scanner::DirectoryScanner;
pub use spec::SearchSpec;
pub use types::{EntryKind, ErrorPolicy, FileAttributes, FileFindInfo, SearchOrder};
