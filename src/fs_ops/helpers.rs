//! I/O error description helpers.
//!
//! Enriches io::Error text with actionable, platform-aware hints so a failed
//! operation can be reported in one line.

use std::io;

#[cfg(unix)]
use libc;

/// Human-friendly text for `e`, with a hint and the raw OS code when known.
pub fn describe_io_error(e: &io::Error) -> String {
    let mut msg = e.to_string();

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str(" (permission denied; check ownership and write permissions)");
                }
                libc::EXDEV => {
                    msg.push_str(" (cross-device move; rename across filesystems is not supported)");
                }
                libc::EBUSY => {
                    msg.push_str(" (resource busy; ensure no other process is using it)");
                }
                libc::ENOENT => {
                    msg.push_str(" (path not found; a parent may be missing, try without -S)");
                }
                libc::EEXIST => {
                    msg.push_str(" (already exists)");
                }
                libc::ENOTEMPTY => {
                    msg.push_str(" (directory not empty)");
                }
                libc::ENOTDIR => {
                    msg.push_str(" (a path component is not a directory)");
                }
                libc::EROFS => {
                    msg.push_str(" (read-only filesystem)");
                }
                libc::ENAMETOOLONG => {
                    msg.push_str(" (filename or path too long)");
                }
                _ => {}
            }
        }
        #[cfg(windows)]
        {
            match code {
                5 => msg.push_str(" (access denied; check permissions)"), // ERROR_ACCESS_DENIED
                17 => msg.push_str(" (not same device; cross-filesystem move)"), // ERROR_NOT_SAME_DEVICE
                32 => msg.push_str(" (sharing violation; file is in use)"), // ERROR_SHARING_VIOLATION
                2 | 3 => msg.push_str(" (path not found)"), // FILE/PATH NOT FOUND
                145 => msg.push_str(" (directory not empty)"), // ERROR_DIR_NOT_EMPTY
                206 => msg.push_str(" (filename or path too long)"), // ERROR_FILENAME_EXCED_RANGE
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {}]", code));
    } else {
        match e.kind() {
            io::ErrorKind::PermissionDenied => {
                msg.push_str(" (permission denied; check ownership and write permissions)");
            }
            io::ErrorKind::NotFound => {
                msg.push_str(" (path not found)");
            }
            io::ErrorKind::AlreadyExists => {
                msg.push_str(" (already exists)");
            }
            _ => {}
        }
    }

    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn os_errors_carry_hint_and_code() {
        let e = io::Error::from_raw_os_error(libc::ENOENT);
        let msg = describe_io_error(&e);
        assert!(msg.contains("path not found"), "{msg}");
        assert!(msg.contains(&format!("[os code: {}]", libc::ENOENT)), "{msg}");
    }

    #[test]
    fn kind_only_errors_get_kind_hint() {
        let e = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert!(describe_io_error(&e).starts_with("nope (permission denied"));
    }
}
