//! Plan-time model of the directory tree.
//!
//! Directories are listed lazily from disk the first time the planner looks
//! inside them, then every planned operation is applied to the model so later
//! decisions see the tree as it will be at that point of the plan. The disk
//! itself is only read.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    /// Files, symlinks (including symlinks to directories) and the rest.
    Other,
}

#[derive(Debug)]
struct Node {
    kind: EntryKind,
    /// Where this node's children live on disk; `None` for planned directories.
    origin: Option<PathBuf>,
    /// `None` until listed.
    children: Option<BTreeMap<OsString, usize>>,
    /// Listing failed or was incomplete; never treated as empty.
    opaque: bool,
}

const ROOT: usize = 0;

#[derive(Debug)]
pub struct TreeModel {
    nodes: Vec<Node>,
}

impl TreeModel {
    pub fn new(root: &Path) -> Self {
        Self {
            nodes: vec![Node {
                kind: EntryKind::Dir,
                origin: Some(root.to_path_buf()),
                children: None,
                opaque: false,
            }],
        }
    }

    pub fn kind(&mut self, path: &Path) -> Option<EntryKind> {
        self.lookup(path).map(|i| self.nodes[i].kind)
    }

    pub fn exists(&mut self, path: &Path) -> bool {
        self.lookup(path).is_some()
    }

    pub fn is_dir(&mut self, path: &Path) -> bool {
        self.kind(path) == Some(EntryKind::Dir)
    }

    pub fn is_empty_dir(&mut self, path: &Path) -> bool {
        match self.lookup(path) {
            Some(i) if self.nodes[i].kind == EntryKind::Dir => {
                self.load(i);
                !self.nodes[i].opaque && self.nodes[i].children.as_ref().is_none_or(|c| c.is_empty())
            }
            _ => false,
        }
    }

    /// Move the entry at `src` to `dst`. Returns false (model unchanged) when
    /// `src` is missing or `dst`'s parent is not a directory.
    pub fn rename(&mut self, src: &Path, dst: &Path) -> bool {
        let (Some(dst_parent), Some(dst_name)) = (dst.parent(), dst.file_name()) else {
            return false;
        };
        let Some(pidx) = self.lookup(dst_parent) else {
            return false;
        };
        if self.nodes[pidx].kind != EntryKind::Dir || !self.exists(src) {
            return false;
        }
        let Some(node) = self.detach(src) else {
            return false;
        };
        self.load(pidx);
        if let Some(children) = self.nodes[pidx].children.as_mut() {
            children.insert(dst_name.to_owned(), node);
        }
        true
    }

    /// Create `path` and any missing parents. On failure returns the first
    /// prefix that exists but is not a directory.
    pub fn make_dirs(&mut self, path: &Path) -> Result<(), PathBuf> {
        let mut cur = ROOT;
        let mut prefix = PathBuf::new();
        for comp in path.components() {
            let Component::Normal(name) = comp else {
                continue;
            };
            prefix.push(name);
            cur = match self.child(cur, name) {
                Some(i) if self.nodes[i].kind == EntryKind::Dir => i,
                Some(_) => return Err(prefix),
                None => self.insert_dir(cur, name),
            };
        }
        Ok(())
    }

    pub fn remove(&mut self, path: &Path) {
        let _ = self.detach(path);
    }

    fn insert_dir(&mut self, parent: usize, name: &OsStr) -> usize {
        self.nodes.push(Node {
            kind: EntryKind::Dir,
            origin: None,
            children: Some(BTreeMap::new()),
            opaque: false,
        });
        let idx = self.nodes.len() - 1;
        self.load(parent);
        if let Some(children) = self.nodes[parent].children.as_mut() {
            children.insert(name.to_owned(), idx);
        }
        idx
    }

    fn detach(&mut self, path: &Path) -> Option<usize> {
        let parent = path.parent()?;
        let name = path.file_name()?;
        let pidx = self.lookup(parent)?;
        self.load(pidx);
        self.nodes[pidx].children.as_mut()?.remove(name)
    }

    fn lookup(&mut self, path: &Path) -> Option<usize> {
        let mut cur = ROOT;
        for comp in path.components() {
            match comp {
                Component::Normal(name) => {
                    if self.nodes[cur].kind != EntryKind::Dir {
                        return None;
                    }
                    cur = self.child(cur, name)?;
                }
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(cur)
    }

    fn child(&mut self, idx: usize, name: &OsStr) -> Option<usize> {
        self.load(idx);
        self.nodes[idx].children.as_ref()?.get(name).copied()
    }

    fn load(&mut self, idx: usize) {
        if self.nodes[idx].children.is_some() {
            return;
        }
        let mut children = BTreeMap::new();
        let mut opaque = false;
        if self.nodes[idx].kind == EntryKind::Dir
            && let Some(origin) = self.nodes[idx].origin.clone()
        {
            match fs::read_dir(&origin) {
                Ok(rd) => {
                    for entry in rd {
                        let entry = match entry {
                            Ok(entry) => entry,
                            Err(e) => {
                                warn!(dir = %origin.display(), error = %e, "incomplete directory listing");
                                opaque = true;
                                continue;
                            }
                        };
                        // DirEntry::file_type does not follow symlinks.
                        let kind = match entry.file_type() {
                            Ok(ft) if ft.is_dir() => EntryKind::Dir,
                            _ => EntryKind::Other,
                        };
                        self.nodes.push(Node {
                            kind,
                            origin: Some(entry.path()),
                            children: None,
                            opaque: false,
                        });
                        children.insert(entry.file_name(), self.nodes.len() - 1);
                    }
                }
                Err(e) => {
                    warn!(dir = %origin.display(), error = %e, "cannot list directory");
                    opaque = true;
                }
            }
        }
        self.nodes[idx].children = Some(children);
        self.nodes[idx].opaque = opaque;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn reflects_disk_until_changed() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("x/a").write_str("a").unwrap();
        temp.child("f").touch().unwrap();

        let mut m = TreeModel::new(temp.path());
        assert!(m.is_dir(Path::new("x")));
        assert_eq!(m.kind(Path::new("f")), Some(EntryKind::Other));
        assert!(!m.exists(Path::new("y")));
        assert!(!m.is_empty_dir(Path::new("x")));

        assert!(m.rename(Path::new("x/a"), Path::new("b")));
        assert!(m.is_empty_dir(Path::new("x")));
        assert!(m.exists(Path::new("b")));
        // disk untouched
        temp.child("x/a").assert("a");
    }

    #[test]
    fn moved_directories_keep_their_contents() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("d/inner/leaf").touch().unwrap();

        let mut m = TreeModel::new(temp.path());
        assert!(m.rename(Path::new("d"), Path::new("e")));
        assert!(m.exists(Path::new("e/inner/leaf")));
        assert!(!m.exists(Path::new("d/inner/leaf")));
    }

    #[test]
    fn make_dirs_reports_blocking_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("f").touch().unwrap();

        let mut m = TreeModel::new(temp.path());
        assert_eq!(m.make_dirs(Path::new("f/g/h")), Err(PathBuf::from("f")));
        assert_eq!(m.make_dirs(Path::new("n/o")), Ok(()));
        assert!(m.is_empty_dir(Path::new("n/o")));
        assert!(!m.is_empty_dir(Path::new("n")));
    }

    #[test]
    fn rename_needs_existing_parent() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a").touch().unwrap();

        let mut m = TreeModel::new(temp.path());
        assert!(!m.rename(Path::new("a"), Path::new("missing/a")));
        assert!(m.exists(Path::new("a")));
    }

    #[test]
    fn unlistable_directory_is_not_empty() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("d").create_dir_all().unwrap();

        let mut m = TreeModel::new(temp.path());
        assert!(m.is_dir(Path::new("d")));
        // listed in the model, gone on disk before its own listing
        std::fs::remove_dir(temp.child("d").path()).unwrap();
        assert!(!m.is_empty_dir(Path::new("d")));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_dirs() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("real").create_dir_all().unwrap();
        std::os::unix::fs::symlink(temp.child("real").path(), temp.child("link").path()).unwrap();

        let mut m = TreeModel::new(temp.path());
        assert_eq!(m.kind(Path::new("link")), Some(EntryKind::Other));
    }
}
