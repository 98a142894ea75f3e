//! Windows backend built on `FindFirstFileExW`.
//!
//! Listings use the basic information level (no 8.3 names) with large
//! fetch buffers. The directory-only and case hints of a request are passed
//! to the system; the core re-checks both, so this is only a saving.

use crate::paths::extended_length_path;
use crate::winapi_utils::{
    filetime_ticks, filetime_to_datetime, from_wide_buffer, FindHandle, ERROR_FILE_NOT_FOUND,
};
use burrow_core::backend::{RawEntry, ScanBackend, ScanHandle, ScanRequest};
use burrow_core::FileAttributes;
use std::io;
use tracing::trace;
use windows::Win32::Storage::FileSystem::{
    FindExInfoBasic, FindExSearchLimitToDirectories, FindExSearchNameMatch,
    FIND_FIRST_EX_CASE_SENSITIVE, FIND_FIRST_EX_LARGE_FETCH, WIN32_FIND_DATAW,
};

/// Native scan backend for Windows.
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
        let search = extended_length_path(request.dir).join(request.pattern);

        let mut flags = FIND_FIRST_EX_LARGE_FETCH;
        if request.case_sensitive {
            flags |= FIND_FIRST_EX_CASE_SENSITIVE;
        }
        let search_op = if request.directories_only {
            FindExSearchLimitToDirectories
        } else {
            FindExSearchNameMatch
        };

        let mut data = WIN32_FIND_DATAW::default();
        match FindHandle::first(&search, FindExInfoBasic, search_op, flags, &mut data) {
            Ok(handle) => Ok(Box::new(FindListing {
                handle: Some(handle),
                pending: Some(to_raw_entry(&data)),
            })),
            // A pattern that matches nothing in an existing directory
            Err(e) if e.raw_os_error() == Some(ERROR_FILE_NOT_FOUND) => {
                trace!(search = %search.display(), "No matching entries");
                Ok(Box::new(FindListing {
                    handle: None,
                    pending: None,
                }))
            }
            Err(e) => Err(e),
        }
    }

    fn name(&self) -> &'static str {
        "find-first-file"
    }
}

/// Open find handle plus the entry delivered by `FindFirstFileExW`.
struct FindListing {
    handle: Option<FindHandle>,
    pending: Option<RawEntry>,
}

impl ScanHandle for FindListing {
    fn next_entry(&mut self) -> io::Result<Option<RawEntry>> {
        if let Some(entry) = self.pending.take() {
            return Ok(Some(entry));
        }
        let Some(handle) = self.handle.as_mut() else {
            return Ok(None);
        };

        let mut data = WIN32_FIND_DATAW::default();
        if handle.next(&mut data)? {
            Ok(Some(to_raw_entry(&data)))
        } else {
            // Exhausted: close now rather than when the listing is dropped
            self.handle = None;
            Ok(None)
        }
    }
}

fn to_raw_entry(data: &WIN32_FIND_DATAW) -> RawEntry {
    let size = ((data.nFileSizeHigh as u64) << 32) | data.nFileSizeLow as u64;
    RawEntry::new(
        from_wide_buffer(&data.cFileName),
        FileAttributes(data.dwFileAttributes),
    )
    .with_size(size)
    .with_times(
        filetime_to_datetime(filetime_ticks(&data.ftCreationTime)),
        filetime_to_datetime(filetime_ticks(&data.ftLastAccessTime)),
        filetime_to_datetime(filetime_ticks(&data.ftLastWriteTime)),
    )
}
