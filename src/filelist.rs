//! Plain-text file lists: one path per line.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::errors::DirEditError;

/// Read `path` into a list of lines, line endings stripped.
pub fn read_file_list(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("error reading file list '{}'", path.display()))?;
    Ok(parse_file_list(&contents))
}

/// Split list text into entries. Blank lines are kept (they mark removals).
pub fn parse_file_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|l| l.trim_end_matches(['\r', '\n']).to_owned())
        .collect()
}

/// Every entry must exist (without following a final symlink), relative to `root`.
pub fn check_file_list<S: AsRef<str>>(root: &Path, list: &[S]) -> Result<()> {
    for entry in list {
        let entry = entry.as_ref();
        if let Err(e) = fs::symlink_metadata(root.join(entry)) {
            bail!("{entry}: {e}");
        }
    }
    Ok(())
}

/// Reject names containing newlines unless they will be mangled.
pub fn check_newlines<S: AsRef<str>>(list: &[S], mangle: bool) -> Result<(), DirEditError> {
    if mangle {
        return Ok(());
    }
    match list.iter().map(AsRef::as_ref).find(|s| s.contains(['\n', '\r'])) {
        Some(name) => Err(DirEditError::UnsupportedNewlineInName(name.to_owned())),
        None => Ok(()),
    }
}

/// Replace each run of newline characters by a single space.
pub fn mangle_newlines(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if c == '\n' || c == '\r' {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Resolve FILES arguments against the directory the program was started in.
pub fn resolve_file_args(orig_cwd: &Path, files: &[String]) -> Vec<String> {
    files
        .iter()
        .map(|f| {
            if Path::new(f).is_absolute() {
                f.clone()
            } else {
                orig_cwd.join(f).to_string_lossy().into_owned()
            }
        })
        .collect()
}
