//! Directory listing for the initial file list.
//! - Flat: names directly inside the directory.
//! - Recursive (walkdir): leaves only (files, symlinks, empty directories).
//! - Entries starting with '.' are skipped unless `all`.
//!
//! Returned paths are relative to the listed directory.

use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::fs;
use std::path::{Component, Path};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(is_hidden_name)
}

fn utf8_or_warn(path: &Path) -> Option<String> {
    match path.to_str() {
        Some(s) => Some(s.to_owned()),
        None => {
            warn!(path = %path.display(), "Skipping entry with non-UTF-8 name");
            None
        }
    }
}

/// Names in `dir`, unsorted.
pub fn read_dir_flat(dir: &Path, all: bool) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("{}: cannot list directory", dir.display()))? {
        let entry = entry.with_context(|| format!("{}: cannot list directory", dir.display()))?;
        let Some(name) = utf8_or_warn(Path::new(&entry.file_name())) else {
            continue;
        };
        if all || !is_hidden_name(&name) {
            names.push(name);
        }
    }
    Ok(names)
}

/// Leaf paths below `dir`, unsorted.
///
/// Symlinks to directories are leaves (never followed). Empty directories
/// are listed, except `dir` itself. Hidden directories hide their subtree.
pub fn read_dir_recursive(dir: &Path, all: bool) -> Result<Vec<String>> {
    let mut paths = Vec::new();
    let walker = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| all || e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry.with_context(|| format!("{}: cannot walk directory", dir.display()))?;
        if entry.depth() == 0 {
            continue;
        }
        let leaf = if entry.file_type().is_dir() {
            // hidden children still make a directory non-empty
            fs::read_dir(entry.path())
                .with_context(|| format!("{}: cannot list directory", entry.path().display()))?
                .next()
                .is_none()
        } else {
            true
        };
        if !leaf {
            continue;
        }
        let rel = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        if let Some(s) = utf8_or_warn(rel) {
            paths.push(s);
        }
    }
    Ok(paths)
}

/// Sort paths component-wise: by text, or by leading numeric value.
pub fn sort_paths(paths: &mut [String], numeric: bool) {
    paths.sort_by(|a, b| compare_paths(a, b, numeric));
}

fn components(path: &str) -> impl Iterator<Item = &str> {
    Path::new(path).components().filter_map(|c| match c {
        Component::Normal(s) => s.to_str(),
        _ => None,
    })
}

fn compare_paths(a: &str, b: &str, numeric: bool) -> Ordering {
    let mut ca = components(a);
    let mut cb = components(b);
    loop {
        match (ca.next(), cb.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = if numeric {
                    let (nx, rx) = numkey(x);
                    let (ny, ry) = numkey(y);
                    nx.total_cmp(&ny).then_with(|| rx.cmp(ry))
                } else {
                    x.cmp(y)
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Split `name` into its leading number and the remaining text.
///
/// Matches optional whitespace, an optional sign, digits, an optional
/// fraction and trailing whitespace; names without a number key as 0.0.
pub fn numkey(name: &str) -> (f64, &str) {
    let bytes = name.as_bytes();
    let skip_ws = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    };
    let mut i = skip_ws(0);
    let start = i;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let digits = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits {
        return (0.0, name);
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    let number = name[start..i].trim_end_matches('.');
    let value = number.parse::<f64>().unwrap_or(0.0);
    (value, &name[skip_ws(i)..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn numkey_parses_leading_numbers() {
        assert_eq!(numkey("23 - foo"), (23.0, "- foo"));
        assert_eq!(numkey("  -1.5x"), (-1.5, "x"));
        assert_eq!(numkey("7."), (7.0, ""));
        assert_eq!(numkey("foo"), (0.0, "foo"));
        assert_eq!(numkey("+"), (0.0, "+"));
    }

    #[test]
    fn numeric_sort_orders_by_value() {
        let mut v: Vec<String> = ["10 b", "9 a", "2/10", "2/9", "x"].iter().map(|s| s.to_string()).collect();
        sort_paths(&mut v, true);
        assert_eq!(v, ["x", "2/9", "2/10", "9 a", "10 b"]);
        sort_paths(&mut v, false);
        assert_eq!(v, ["10 b", "2/10", "2/9", "9 a", "x"]);
    }

    #[test]
    fn flat_listing_hides_dotfiles() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a").touch().unwrap();
        temp.child(".h").touch().unwrap();
        temp.child("d/x").touch().unwrap();
        let mut names = read_dir_flat(temp.path(), false).unwrap();
        names.sort();
        assert_eq!(names, ["a", "d"]);
        let mut names = read_dir_flat(temp.path(), true).unwrap();
        names.sort();
        assert_eq!(names, [".h", "a", "d"]);
    }

    #[test]
    fn recursive_listing_yields_leaves() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a/b/c").touch().unwrap();
        temp.child("a/empty").create_dir_all().unwrap();
        temp.child("a/.hidden/x").touch().unwrap();
        temp.child("only_hidden/.x").touch().unwrap();
        temp.child("top").touch().unwrap();
        let mut paths = read_dir_recursive(temp.path(), false).unwrap();
        sort_paths(&mut paths, false);
        assert_eq!(paths, ["a/b/c", "a/empty", "top"]);

        let mut paths = read_dir_recursive(temp.path(), true).unwrap();
        sort_paths(&mut paths, false);
        assert_eq!(paths, ["a/.hidden/x", "a/b/c", "a/empty", "only_hidden/.x", "top"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_leaves() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("real/f").touch().unwrap();
        std::os::unix::fs::symlink("real", temp.child("link").path()).unwrap();
        let mut paths = read_dir_recursive(temp.path(), false).unwrap();
        sort_paths(&mut paths, false);
        assert_eq!(paths, ["link", "real/f"]);
    }
}
