//! Non-clobbering rename.
//! - Skips (with a warning) when the destination already exists.
//! - On Unix, best-effort fsync of the destination directory after rename.
//!
//! The existence check and the rename are separate syscalls; another process
//! can still create `dst` in between.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use crate::platform::same_entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    /// Destination existed; nothing was changed.
    SkippedExisting,
}

pub fn rename_no_clobber(src: &Path, dst: &Path) -> io::Result<RenameOutcome> {
    // symlink_metadata does not follow a final symlink, so dangling links count.
    if fs::symlink_metadata(dst).is_ok() && !is_respelling(src, dst) {
        return Ok(RenameOutcome::SkippedExisting);
    }

    fs::rename(src, dst)?;

    #[cfg(unix)]
    if let Some(parent) = dst.parent() {
        // Ignore fsync errors to avoid turning a successful rename into a failure.
        let _ = fsync_dir(parent);
    }

    Ok(RenameOutcome::Renamed)
}

/// `dst` is `src` spelled differently (case-only rename on a case-insensitive volume).
fn is_respelling(src: &Path, dst: &Path) -> bool {
    let (Some(a), Some(b)) = (src.file_name(), dst.file_name()) else {
        return false;
    };
    a != b
        && a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
        && same_entry(src, dst)
}

#[cfg(unix)]
fn fsync_dir(dir: &Path) -> io::Result<()> {
    let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
    let f = File::open(dir)?;
    f.sync_all()
}
