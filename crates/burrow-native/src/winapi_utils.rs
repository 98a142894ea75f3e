//! Low-level Windows API utilities.
//!
//! This module contains helper functions for working with Windows APIs.
//! All unsafe code for Windows API calls is concentrated here.

use chrono::{DateTime, TimeZone, Utc};
use std::ffi::c_void;
use std::io;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{FILETIME, HANDLE, INVALID_HANDLE_VALUE};
use windows::Win32::Storage::FileSystem::{
    FindClose, FindFirstFileExW, FindNextFileW, FINDEX_INFO_LEVELS, FINDEX_SEARCH_OPS,
    FIND_FIRST_EX_FLAGS, WIN32_FIND_DATAW,
};

/// RAII wrapper for a find handle.
///
/// Closes the handle with `FindClose` exactly once, when dropped.
pub struct FindHandle(HANDLE);

// SAFETY: a find handle is not tied to the thread that opened it; it is only
// ever used through `&mut self`.
unsafe impl Send for FindHandle {}

impl FindHandle {
    /// Start a listing and fill `data` with the first entry.
    pub fn first(
        search: &Path,
        info_level: FINDEX_INFO_LEVELS,
        search_op: FINDEX_SEARCH_OPS,
        flags: FIND_FIRST_EX_FLAGS,
        data: &mut WIN32_FIND_DATAW,
    ) -> io::Result<Self> {
        let wide = to_wide_path(search);

        // SAFETY: `wide` is NUL-terminated and outlives the call; `data` is a
        // valid, writable WIN32_FIND_DATAW for the whole call.
        let result = unsafe {
            FindFirstFileExW(
                PCWSTR(wide.as_ptr()),
                info_level,
                data as *mut WIN32_FIND_DATAW as *mut c_void,
                search_op,
                None,
                flags,
            )
        };

        match result {
            Ok(handle) if handle != INVALID_HANDLE_VALUE => Ok(FindHandle(handle)),
            _ => Err(io::Error::last_os_error()),
        }
    }

    /// Fill `data` with the next entry.
    ///
    /// Returns `Ok(false)` once the listing is exhausted.
    pub fn next(&mut self, data: &mut WIN32_FIND_DATAW) -> io::Result<bool> {
        // SAFETY: the handle is open for as long as `self` lives.
        match unsafe { FindNextFileW(self.0, data) } {
            Ok(()) => Ok(true),
            Err(_) => {
                let err = io::Error::last_os_error();
                if err.raw_os_error() == Some(ERROR_NO_MORE_FILES) {
                    Ok(false)
                } else {
                    Err(err)
                }
            }
        }
    }
}

impl Drop for FindHandle {
    fn drop(&mut self) {
        // SAFETY: the handle came from a successful FindFirstFileExW and is
        // closed only here.
        unsafe {
            let _ = FindClose(self.0);
        }
    }
}

pub const ERROR_FILE_NOT_FOUND: i32 = 2;
pub const ERROR_NO_MORE_FILES: i32 = 18;

/// Convert a path to a null-terminated wide string (UTF-16).
pub fn to_wide_path(path: &Path) -> Vec<u16> {
    path.as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

/// Read a NUL-terminated UTF-16 buffer, such as `cFileName`.
pub fn from_wide_buffer(buffer: &[u16]) -> std::ffi::OsString {
    use std::os::windows::ffi::OsStringExt;

    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    std::ffi::OsString::from_wide(&buffer[..len])
}

/// Combine the two halves of a FILETIME.
pub fn filetime_ticks(ft: &FILETIME) -> i64 {
    ((ft.dwHighDateTime as i64) << 32) | ft.dwLowDateTime as i64
}

/// Convert a FILETIME tick count to a chrono DateTime.
///
/// Zero means "not recorded" and yields `None`.
pub fn filetime_to_datetime(ft: i64) -> Option<DateTime<Utc>> {
    // FILETIME is 100-nanosecond intervals since January 1, 1601
    const FILETIME_UNIX_DIFF: i64 = 116444736000000000;
    const TICKS_PER_SECOND: i64 = 10_000_000;

    if ft == 0 {
        return None;
    }

    let unix_ticks = ft - FILETIME_UNIX_DIFF;
    let seconds = unix_ticks.div_euclid(TICKS_PER_SECOND);
    let nanos = (unix_ticks.rem_euclid(TICKS_PER_SECOND) * 100) as u32;

    Utc.timestamp_opt(seconds, nanos).single()
}
