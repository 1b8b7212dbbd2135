//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the rest of the codebase can remain platform-agnostic.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{open_log_file_secure_append, same_entry};

#[cfg(not(unix))]
pub use windows::{open_log_file_secure_append, same_entry};

/// Fold a relative path string for identity comparisons.
///
/// Renames on macOS and Windows are case-insensitive, so two spellings that
/// differ only in case name the same entry there. Windows additionally treats
/// `/` and `\` as the same separator.
pub fn fold_case(path: &str) -> String {
    if cfg!(target_os = "macos") {
        path.to_lowercase()
    } else if cfg!(windows) {
        path.to_lowercase().replace('/', "\\")
    } else {
        path.to_owned()
    }
}
