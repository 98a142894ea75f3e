//! Extended-length path formatting.
//!
//! Win32 path APIs stop at `MAX_PATH` characters unless the path carries the
//! `\\?\` prefix (or `\\?\UNC\` for network shares). The prefix also switches
//! off path normalisation, so separators are converted to backslashes here.
//! Kept free of platform calls so it can be tested everywhere.

use std::path::{Path, PathBuf};

const VERBATIM: &str = r"\\?\";
const DEVICE: &str = r"\\.\";
const VERBATIM_UNC: &str = r"\\?\UNC\";

/// Returns the extended-length form of an absolute Windows path.
///
/// Paths that already carry a verbatim or device prefix, relative paths and
/// paths that are not valid Unicode are returned unchanged.
pub fn extended_length_path(path: &Path) -> PathBuf {
    let Some(text) = path.as_os_str().to_str() else {
        return path.to_path_buf();
    };

    if text.starts_with(VERBATIM) || text.starts_with(DEVICE) {
        return path.to_path_buf();
    }

    let text = text.replace('/', "\\");
    if let Some(share) = text.strip_prefix(r"\\") {
        return PathBuf::from(format!("{}{}", VERBATIM_UNC, share));
    }
    if has_drive_root(&text) {
        return PathBuf::from(format!("{}{}", VERBATIM, text));
    }
    path.to_path_buf()
}

/// `X:\...`
fn has_drive_root(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'\\'
}
