//! # Burrow Native Backends
//!
//! This crate provides the platform implementations of the
//! [`ScanBackend`](burrow_core::ScanBackend) trait. It uses:
//!
//! - **FindFirstFileExW / FindNextFileW / FindClose** on Windows
//! - **opendir / readdir / closedir** (through `std::fs::read_dir`) elsewhere
//!
//! ## Architecture
//!
//! The crate is structured to isolate all platform calls and unsafe code:
//!
//! - `win32.rs`: Windows listing handle and attribute mapping
//! - `winapi_utils.rs`: Low-level Windows API wrappers
//! - `unix.rs`: `read_dir` listing handle with per-entry `lstat`
//! - `paths.rs`: Extended-length path formatting (pure, platform-neutral)
//!
//! Whatever the platform, [`NativeBackend`] is the type to hand to a
//! [`Finder`](burrow_core::Finder).

mod paths;

#[cfg(windows)]
mod win32;
#[cfg(windows)]
mod winapi_utils;

#[cfg(windows)]
pub use win32::NativeBackend;

#[cfg(unix)]
mod unix;

#[cfg(unix)]
pub use unix::NativeBackend;

pub use paths::extended_length_path;
