//! Error types for Burrow core operations.
//!
//! This module defines well-structured error types using `thiserror` for
//! library-level errors, while the command-line front end uses `anyhow` for
//! convenient error handling.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using BurrowError
pub type Result<T> = std::result::Result<T, BurrowError>;

/// Core error types for Burrow operations.
///
/// Invalid arguments are always reported before any native call is made.
/// Native failures keep the originating `io::Error` as their source so the
/// OS error code survives (see [`BurrowError::raw_os_error`]).
#[derive(Error, Debug)]
pub enum BurrowError {
    // === Argument Errors ===
    /// A search request was malformed
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A glob pattern could not be compiled into a matcher
    #[error("invalid search pattern: {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // === Scan Errors ===
    /// The directory to scan does not exist
    #[error("directory not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The native scan primitive failed for some other reason
    #[error("failed to scan {}: {source}", path.display())]
    Native {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // === Configuration Errors ===
    /// Configuration file parsing failed
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    // === I/O Errors ===
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl BurrowError {
    /// Create an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        BurrowError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Classify a failed native call against `path`.
    ///
    /// A missing directory becomes `NotFound`; everything else keeps the
    /// original error as `Native`.
    pub fn from_native(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            BurrowError::NotFound { path }
        } else {
            BurrowError::Native { path, source }
        }
    }

    /// Returns true if this error rejects the request itself
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            BurrowError::InvalidArgument { .. } | BurrowError::InvalidPattern { .. }
        )
    }

    /// Returns true if the scanned path did not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, BurrowError::NotFound { .. })
    }

    /// Returns true if the OS refused access to the scanned path
    pub fn is_permission_denied(&self) -> bool {
        match self {
            BurrowError::Native { source, .. } | BurrowError::Io(source) => {
                source.kind() == io::ErrorKind::PermissionDenied
            }
            _ => false,
        }
    }

    /// The OS error code of a native failure, if one was reported
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            BurrowError::Native { source, .. } | BurrowError::Io(source) => source.raw_os_error(),
            _ => None,
        }
    }
}
