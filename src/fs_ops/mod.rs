//! Filesystem primitives behind plan operations.

mod helpers;
mod rename;

pub use helpers::describe_io_error;
pub use rename::{rename_no_clobber, RenameOutcome};

use std::fs;
use std::io;
use std::path::Path;

/// `mkdir -p`: existing directories are fine.
pub fn make_dirs(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// `mkdir`: fails if anything exists at `path`.
pub fn make_dir(path: &Path) -> io::Result<()> {
    fs::create_dir(path)
}

/// `rmdir`: empty directories only.
pub fn remove_dir(path: &Path) -> io::Result<()> {
    fs::remove_dir(path)
}

/// `rm`: a file or symlink (never follows the link).
pub fn remove_file(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

/// `rm -r`
pub fn remove_tree(path: &Path) -> io::Result<()> {
    fs::remove_dir_all(path)
}
