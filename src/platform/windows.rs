//! Windows implementations of platform helpers (best-effort).
//!
//! Notes:
//! - We avoid following symlinks only where std allows (limited on Windows).
//! - std exposes no stable file index, so identity is decided by spelling only.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Open log file for appending (best-effort; no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Two existing paths name the same entry when they are equal ignoring case.
pub fn same_entry(a: &Path, b: &Path) -> bool {
    if std::fs::symlink_metadata(a).is_err() || std::fs::symlink_metadata(b).is_err() {
        return false;
    }
    a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
}
