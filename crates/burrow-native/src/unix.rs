//! Unix backend built on `std::fs::read_dir`.
//!
//! `read_dir` wraps opendir/readdir/closedir; dropping the `ReadDir` closes
//! the stream. Each entry is `lstat`ed so symbolic links are reported as
//! reparse points instead of being followed.

use burrow_core::backend::{RawEntry, ScanBackend, ScanHandle, ScanRequest};
use burrow_core::FileAttributes;
use chrono::{DateTime, Utc};
use std::ffi::OsString;
use std::fs::{self, Metadata, ReadDir};
use std::io;
use std::path::PathBuf;
use tracing::trace;

/// Native scan backend for Unix platforms.
///
/// The name pattern hint is ignored: `readdir` has no server-side filter and
/// the core matches every name itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl NativeBackend {
    /// Create a new backend.
    pub fn new() -> Self {
        NativeBackend
    }
}

impl ScanBackend for NativeBackend {
    fn open(&self, request: &ScanRequest<'_>) -> io::Result<Box<dyn ScanHandle>> {
        let entries = fs::read_dir(request.dir)?;
        Ok(Box::new(ReadDirHandle {
            dir: request.dir.to_path_buf(),
            entries,
            directories_only: request.directories_only,
        }))
    }

    fn name(&self) -> &'static str {
        "readdir"
    }
}

/// Open directory stream.
struct ReadDirHandle {
    dir: PathBuf,
    entries: ReadDir,
    directories_only: bool,
}

impl ScanHandle for ReadDirHandle {
    fn next_entry(&mut self) -> io::Result<Option<RawEntry>> {
        for entry in self.entries.by_ref() {
            let entry = entry?;

            // DirEntry::metadata does not traverse symlinks
            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    trace!(dir = %self.dir.display(), name = ?entry.file_name(), "Entry vanished before lstat");
                    continue;
                }
                Err(e) => return Err(e),
            };

            let target_is_dir = metadata.file_type().is_symlink()
                && fs::metadata(entry.path()).map(|m| m.is_dir()).unwrap_or(false);
            let raw = to_raw_entry(entry.file_name(), &metadata, target_is_dir);
            if self.directories_only && !raw.attributes.is_directory() {
                continue;
            }
            return Ok(Some(raw));
        }
        Ok(None)
    }
}

fn to_raw_entry(name: OsString, metadata: &Metadata, target_is_dir: bool) -> RawEntry {
    let attributes = attributes_for(&name, metadata, target_is_dir);
    let size = if attributes.is_directory() || attributes.is_reparse_point() {
        0
    } else {
        metadata.len()
    };

    RawEntry::new(name, attributes)
        .with_size(size)
        .with_times(
            metadata.created().ok().map(DateTime::<Utc>::from),
            metadata.accessed().ok().map(DateTime::<Utc>::from),
            metadata.modified().ok().map(DateTime::<Utc>::from),
        )
}

/// Map `lstat` results onto the Win32-style attribute set.
fn attributes_for(name: &OsString, metadata: &Metadata, target_is_dir: bool) -> FileAttributes {
    let file_type = metadata.file_type();
    let mut attributes = FileAttributes(0);

    if file_type.is_symlink() {
        attributes |= FileAttributes::REPARSE_POINT;
        if target_is_dir {
            attributes |= FileAttributes::DIRECTORY;
        }
    } else if file_type.is_dir() {
        attributes |= FileAttributes::DIRECTORY;
    }

    if name.as_encoded_bytes().first() == Some(&b'.') {
        attributes |= FileAttributes::HIDDEN;
    }
    if metadata.permissions().readonly() {
        attributes |= FileAttributes::READONLY;
    }
    if attributes.bits() == 0 {
        attributes = FileAttributes::NORMAL;
    }
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn list(dir: &Path, directories_only: bool) -> Vec<RawEntry> {
        let request = ScanRequest {
            dir,
            pattern: "*",
            directories_only,
            case_sensitive: true,
        };
        let mut handle = NativeBackend::new().open(&request).unwrap();
        let mut entries = Vec::new();
        while let Some(entry) = handle.next_entry().unwrap() {
            entries.push(entry);
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    #[test]
    fn test_attributes() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("plain"), b"12345").unwrap();
        fs::write(temp.path().join(".hidden"), b"").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();

        let entries = list(temp.path(), false);
        let names: Vec<_> = entries.iter().map(|e| e.name.to_str().unwrap()).collect();
        assert_eq!(names, vec![".hidden", "plain", "sub"]);

        assert!(entries[0].attributes.contains(FileAttributes::HIDDEN));
        assert_eq!(entries[1].attributes, FileAttributes::NORMAL);
        assert_eq!(entries[1].size, 5);
        assert!(entries[1].modified.is_some());
        assert!(entries[2].attributes.is_directory());
        assert_eq!(entries[2].size, 0);
    }

    #[test]
    fn test_symlinks_are_reparse_points() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("target")).unwrap();
        fs::write(temp.path().join("file"), b"").unwrap();
        std::os::unix::fs::symlink(temp.path().join("target"), temp.path().join("dir_link"))
            .unwrap();
        std::os::unix::fs::symlink(temp.path().join("file"), temp.path().join("file_link"))
            .unwrap();
        std::os::unix::fs::symlink(temp.path().join("nowhere"), temp.path().join("dangling"))
            .unwrap();

        let entries = list(temp.path(), false);
        let find = |name: &str| entries.iter().find(|e| e.name == name).unwrap();

        let dir_link = find("dir_link").attributes;
        assert!(dir_link.is_reparse_point());
        assert!(dir_link.is_directory());

        let file_link = find("file_link").attributes;
        assert!(file_link.is_reparse_point());
        assert!(!file_link.is_directory());

        let dangling = find("dangling").attributes;
        assert!(dangling.is_reparse_point());
        assert!(!dangling.is_directory());
    }

    #[test]
    fn test_directories_only_hint() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("f"), b"").unwrap();
        fs::create_dir(temp.path().join("d")).unwrap();

        let entries = list(temp.path(), true);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "d");
    }

    #[test]
    fn test_open_missing_directory() {
        let temp = TempDir::new().unwrap();
        let request = ScanRequest {
            dir: &temp.path().join("missing"),
            pattern: "*",
            directories_only: false,
            case_sensitive: true,
        };
        let err = NativeBackend::new().open(&request).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
