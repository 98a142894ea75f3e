//! Point queries.
//!
//! Lookups that answer a question about one path rather than enumerate a
//! tree. Each level costs one scanner open/advance/close cycle on the parent
//! directory; nothing is cached.

use crate::error::{BurrowError, Result};
use crate::find::Finder;
use crate::scanner::DirectoryScanner;
use crate::types::FileFindInfo;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf, Prefix};
use std::sync::Arc;
use tracing::trace;

impl Finder {
    /// Look up the entry for `path` in its parent's listing.
    ///
    /// An entry whose name matches exactly is preferred; otherwise the first
    /// case-insensitive match is returned. Returns `Ok(None)` if neither
    /// exists, if the parent directory is missing, or if `path` has no
    /// parent.
    pub fn info(&self, path: impl AsRef<Path>) -> Result<Option<FileFindInfo>> {
        let path = path.as_ref();
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return Ok(None);
        };
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };

        let mut scanner = DirectoryScanner::unfiltered(parent, Arc::clone(self.backend()));
        // Names that are not valid Unicode are listed unhinted and only ever match exactly
        let lowered = name.to_str().map(str::to_lowercase);
        if let Some(hint) = name.to_str() {
            scanner = scanner.with_pattern(hint);
        }
        let mut fallback = None;
        loop {
            match scanner.advance() {
                Ok(Some(info)) if info.file_name() == name => return Ok(Some(info)),
                Ok(Some(info)) => {
                    let folds = match (&lowered, info.file_name().to_str()) {
                        (Some(lowered), Some(found)) => found.to_lowercase() == *lowered,
                        _ => false,
                    };
                    if fallback.is_none() && folds {
                        fallback = Some(info);
                    }
                }
                Ok(None) => break,
                Err(e) if e.is_not_found() => break,
                Err(e) => return Err(e),
            }
        }
        Ok(fallback)
    }

    /// The on-disk spelling of the last component of `path`, lossily
    /// converted to UTF-8.
    pub fn exact_name(&self, path: impl AsRef<Path>) -> Result<Option<String>> {
        Ok(self.info(path)?.map(|info| info.name))
    }

    /// Absolute form of `path` with every component spelled as on disk.
    ///
    /// Relative paths are resolved against the current directory. `.` and
    /// `..` are resolved lexically and drive letters are upper-cased.
    ///
    /// # Errors
    ///
    /// Fails with `NotFound` naming the first component that does not exist.
    pub fn exact_path(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let mut resolved = PathBuf::new();
        for component in absolute.components() {
            match component {
                Component::Prefix(prefix) => {
                    resolved.push(normalize_prefix(prefix.kind(), prefix.as_os_str()))
                }
                Component::RootDir => resolved.push(component.as_os_str()),
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::Normal(name) => {
                    let candidate = resolved.join(name);
                    match self.info(&candidate)? {
                        Some(info) => resolved.push(info.file_name()),
                        None => return Err(BurrowError::NotFound { path: candidate }),
                    }
                }
            }
        }

        trace!(input = %path.display(), resolved = %resolved.display(), "Resolved exact path");
        Ok(resolved)
    }

    /// Returns true if `dir` lists no entry besides `.` and `..`.
    pub fn is_directory_empty(&self, dir: impl AsRef<Path>) -> Result<bool> {
        let mut scanner = DirectoryScanner::unfiltered(dir.as_ref(), Arc::clone(self.backend()));
        Ok(scanner.advance()?.is_none())
    }
}

fn normalize_prefix(kind: Prefix<'_>, raw: &std::ffi::OsStr) -> OsString {
    match kind {
        Prefix::Disk(letter) => format!("{}:", (letter as char).to_ascii_uppercase()).into(),
        Prefix::VerbatimDisk(letter) => {
            format!(r"\\?\{}:", (letter as char).to_ascii_uppercase()).into()
        }
        _ => raw.to_os_string(),
    }
}
