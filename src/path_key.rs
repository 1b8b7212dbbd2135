//! Path identity for mapping entries.
//!
//! A `PathKey` is the lexically normalized path of an entry relative to the
//! working directory. Equality, hashing and ordering use the exact spelling so
//! case-only renames (`a` -> `A`) survive self-map filtering. The case-folded
//! form is exposed separately for cycle closure on case-insensitive systems.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::errors::DirEditError;
use crate::platform::fold_case;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey {
    rel: PathBuf,
    folded: String,
}

impl PathKey {
    /// Resolve `raw` (relative to `root`, or absolute) into a key inside `root`.
    ///
    /// Fails with `OutsideDirectory` when the normalized path escapes `root`
    /// or names `root` itself.
    pub fn resolve(root: &Path, raw: &str) -> Result<Self, DirEditError> {
        let raw_path = Path::new(raw);
        let full = if raw_path.is_absolute() {
            normalize_lexically(raw_path)
        } else {
            normalize_lexically(&root.join(raw_path))
        };
        let base = normalize_lexically(root);
        let rel = full
            .strip_prefix(&base)
            .map_err(|_| DirEditError::OutsideDirectory(raw.to_owned()))?;
        if rel.as_os_str().is_empty() {
            return Err(DirEditError::OutsideDirectory(raw.to_owned()));
        }
        Ok(Self::from_relative(rel))
    }

    /// Build a key from an already-relative, normalized path.
    pub fn from_relative(rel: impl Into<PathBuf>) -> Self {
        let rel = rel.into();
        let folded = fold_case(&rel.to_string_lossy());
        Self { rel, folded }
    }

    /// Exact normalized path, relative to the working directory.
    pub fn normalized(&self) -> &Path {
        &self.rel
    }

    pub fn case_folded(&self) -> &str {
        &self.folded
    }

    /// Same entry under case folding (used to close cycles).
    pub fn same_entry_as(&self, other: &PathKey) -> bool {
        self.folded == other.folded
    }

    /// True when `self` lies strictly below `ancestor`.
    pub fn is_inside(&self, ancestor: &PathKey) -> bool {
        self.rel != ancestor.rel && self.rel.starts_with(&ancestor.rel)
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rel.display())
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
/// `..` at the filesystem root stays at the root; leading `..` of a relative
/// path is kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
