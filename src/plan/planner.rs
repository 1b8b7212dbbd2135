//! Compile chains, cycles and removals into an ordered plan.
//!
//! Emission order: working-directory marker, removals, then every chain and
//! cycle (tail first, cycles evacuating their first element to the staging
//! directory), then staging cleanup. Walks are ordered so that renames nested
//! inside another walk's directories see the tree they expect.
//! Unless safe mode is on, each rename creates its missing parent first and
//! prunes the source ancestors it empties, up to the lowest common ancestor.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use super::model::{EntryKind, TreeModel};
use super::op::Operation;
use super::Plan;
use crate::config::Options;
use crate::decompose::Decomposition;
use crate::path_key::PathKey;

/// Build the plan for `decomposition` and `removals` under `root`.
///
/// Only read-only probes touch the filesystem here.
pub fn plan_operations(
    root: &Path,
    decomposition: &Decomposition,
    removals: &[PathKey],
    opts: &Options,
) -> Plan {
    let walks: Vec<Walk> = decomposition
        .chains
        .iter()
        .map(|c| Walk::new(c.keys(), false))
        .chain(decomposition.cycles.iter().map(|c| Walk::new(c.keys(), true)))
        .collect();
    let protected: HashSet<PathBuf> = walks.iter().flat_map(|w| w.keys.iter().cloned()).collect();

    let mut planner = Planner {
        model: TreeModel::new(root),
        opts,
        protected,
        staging: None,
        ops: vec![Operation::ChangeDir(root.to_path_buf())],
        warnings: Vec::new(),
    };

    for path in removals {
        planner.plan_removal(path.normalized());
    }

    let (order, tangled) = nesting_order(&walks);
    if let Some(i) = tangled {
        planner.warn(format!(
            "renames around {} depend on each other, keeping list order",
            walks[i].keys[0].display()
        ));
    }
    for i in order {
        let walk = &walks[i];
        if walk.closed {
            planner.plan_cycle(walk.keys.clone());
        } else {
            planner.plan_walk(&walk.keys);
        }
    }
    planner.finish()
}

/// A chain or cycle as plain relative paths.
#[derive(Debug)]
struct Walk {
    keys: Vec<PathBuf>,
    closed: bool,
}

impl Walk {
    fn new(keys: &[PathKey], closed: bool) -> Self {
        Self {
            keys: keys.iter().map(|k| k.normalized().to_path_buf()).collect(),
            closed,
        }
    }

    fn sources(&self) -> &[PathBuf] {
        match self.keys.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    fn destinations(&self) -> &[PathBuf] {
        self.keys.get(1..).unwrap_or(&[])
    }
}

fn proper_ancestors(path: &Path) -> impl Iterator<Item = &Path> {
    path.ancestors().skip(1).filter(|a| !a.as_os_str().is_empty())
}

/// Order walks by how their paths nest:
/// - a walk whose source sits inside a directory another walk moves away
///   runs before that walk;
/// - a walk whose destination lies inside another walk's source or
///   destination runs after it, unless the first rule already orders them.
///
/// Ties keep decomposition order. When the rules contradict each other the
/// remaining walks keep that order and the first of them is returned.
fn nesting_order(walks: &[Walk]) -> (Vec<usize>, Option<usize>) {
    let mut src_owner: HashMap<&Path, usize> = HashMap::new();
    let mut dst_owner: HashMap<&Path, usize> = HashMap::new();
    for (i, w) in walks.iter().enumerate() {
        src_owner.extend(w.sources().iter().map(|s| (s.as_path(), i)));
        dst_owner.extend(w.destinations().iter().map(|d| (d.as_path(), i)));
    }

    // (runs first, runs later)
    let mut leave_first: BTreeSet<(usize, usize)> = BTreeSet::new();
    for (i, w) in walks.iter().enumerate() {
        for s in w.sources() {
            for a in proper_ancestors(s) {
                if let Some(&j) = src_owner.get(a)
                    && j != i
                {
                    leave_first.insert((i, j));
                }
            }
        }
    }
    let mut edges = leave_first.clone();
    for (i, w) in walks.iter().enumerate() {
        for d in w.destinations() {
            for a in proper_ancestors(d) {
                for owner in [src_owner.get(a), dst_owner.get(a)] {
                    if let Some(&j) = owner
                        && j != i
                        && !leave_first.contains(&(i, j))
                    {
                        edges.insert((j, i));
                    }
                }
            }
        }
    }

    let n = walks.len();
    let mut in_degree = vec![0usize; n];
    let mut next: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(a, b) in &edges {
        in_degree[b] += 1;
        next[a].push(b);
    }
    let mut ready: BTreeSet<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    let mut placed = vec![false; n];
    while let Some(i) = ready.pop_first() {
        order.push(i);
        placed[i] = true;
        for &j in &next[i] {
            in_degree[j] -= 1;
            if in_degree[j] == 0 {
                ready.insert(j);
            }
        }
    }

    let rest: Vec<usize> = (0..n).filter(|&i| !placed[i]).collect();
    let tangled = rest.first().copied();
    order.extend(rest);
    (order, tangled)
}

/// A source staged away from its own subtree, waiting to land at `dst`.
struct Staged {
    tmp: PathBuf,
    src: PathBuf,
    dst: PathBuf,
}

struct Planner<'a> {
    model: TreeModel,
    opts: &'a Options,
    /// Never pruned: every path named by the mapping, plus the staging dir.
    protected: HashSet<PathBuf>,
    staging: Option<PathBuf>,
    ops: Vec<Operation>,
    warnings: Vec<String>,
}

impl Planner<'_> {
    fn warn(&mut self, msg: String) {
        warn!("{msg}");
        self.warnings.push(msg);
    }

    fn plan_removal(&mut self, path: &Path) {
        match self.model.kind(path) {
            Some(EntryKind::Dir) if self.model.is_empty_dir(path) => {
                self.ops.push(Operation::RemoveDir(path.to_path_buf()));
            }
            Some(EntryKind::Dir) if self.opts.recursive_remove => {
                self.ops.push(Operation::RemoveTree(path.to_path_buf()));
            }
            Some(EntryKind::Dir) => {
                self.warn(format!(
                    "not removing directory {}: not empty (try -R)",
                    path.display()
                ));
                return;
            }
            // files, symlinks and missing entries; a missing one fails at execution
            _ => self.ops.push(Operation::RemoveFile(path.to_path_buf())),
        }
        self.model.remove(path);
    }

    /// Apply the edges of `keys` from the tail backwards.
    ///
    /// Moves into a source's own subtree land after the whole walk, once the
    /// entry that takes the source's place is there.
    fn plan_walk(&mut self, keys: &[PathBuf]) {
        let mut staged = Vec::new();
        for pair in keys.windows(2).rev() {
            if let Some(s) = self.plan_edge(&pair[0], &pair[1]) {
                staged.push(s);
            }
        }
        for s in staged {
            self.land_nested(s);
        }
    }

    fn plan_cycle(&mut self, mut keys: Vec<PathBuf>) {
        if keys.len() < 2 {
            return;
        }
        if !self.model.exists(&keys[0]) {
            // Without evacuation the loop degenerates into a chain ending at keys[0].
            self.warn(format!("path {} does not exist, skip", keys[0].display()));
            self.plan_walk(&keys[1..]);
            return;
        }
        let tmp = self.staging_path_for(&keys[0]);
        self.push_rename(&keys[0], &tmp);
        keys[0] = tmp;
        self.plan_walk(&keys);
    }

    /// Plan one rename. A `dst` inside `src` is only staged here and
    /// returned for `land_nested`.
    fn plan_edge(&mut self, src: &Path, dst: &Path) -> Option<Staged> {
        if !self.model.exists(src) {
            self.warn(format!("path {} does not exist, skip", src.display()));
            return None;
        }

        if dst != src && dst.starts_with(src) {
            let tmp = self.staging_path_for(src);
            self.push_rename(src, &tmp);
            return Some(Staged {
                tmp,
                src: src.to_path_buf(),
                dst: dst.to_path_buf(),
            });
        }

        if self.model.exists(dst) {
            self.warn(format!("path {} already exists, skip", dst.display()));
            return None;
        }

        if !self.opts.safe
            && let Some(parent) = non_empty_parent(dst)
            && !self.ensure_dir(parent, src, dst)
        {
            return None;
        }

        self.push_rename(src, dst);
        if !self.opts.safe {
            self.prune_emptied(src, dst);
        }
        None
    }

    /// Build `dst`'s parent and move the staged entry in, or put it back.
    fn land_nested(&mut self, staged: Staged) {
        let Staged { tmp, src, dst } = staged;
        let ready = if self.model.exists(&dst) {
            self.warn(format!("path {} already exists, skip", dst.display()));
            false
        } else {
            non_empty_parent(&dst).is_none_or(|parent| self.ensure_dir(parent, &src, &dst))
        };
        if ready {
            self.push_rename(&tmp, &dst);
            return;
        }

        if self.model.exists(&src) {
            self.warn(format!(
                "{} stays at {}: {} is taken",
                src.display(),
                tmp.display(),
                src.display()
            ));
        } else {
            self.push_rename(&tmp, &src);
        }
    }

    /// Make sure `dir` exists in the model, emitting `mkdir -p` when needed.
    fn ensure_dir(&mut self, dir: &Path, src: &Path, dst: &Path) -> bool {
        if self.model.is_dir(dir) {
            return true;
        }
        match self.model.make_dirs(dir) {
            Ok(()) => {
                self.ops.push(Operation::MakeDirs(dir.to_path_buf()));
                true
            }
            Err(blocker) => {
                self.warn(format!(
                    "not renaming {} to {}: {} is not a directory",
                    src.display(),
                    dst.display(),
                    blocker.display()
                ));
                false
            }
        }
    }

    /// Remove ancestors of `src` emptied by its rename, deepest first.
    fn prune_emptied(&mut self, src: &Path, dst: &Path) {
        let lca = common_ancestor(src, dst);
        let mut dir = src.parent();
        while let Some(d) = dir {
            if d.as_os_str().is_empty() || d == lca {
                break;
            }
            if self.protected.contains(d) || !self.model.is_empty_dir(d) {
                break;
            }
            self.ops.push(Operation::RemoveDir(d.to_path_buf()));
            self.model.remove(d);
            dir = d.parent();
        }
    }

    fn push_rename(&mut self, src: &Path, dst: &Path) {
        if !self.model.rename(src, dst) {
            debug!(src = %src.display(), dst = %dst.display(), "rename not representable in model");
        }
        self.ops.push(Operation::Rename {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });
    }

    /// Free slot in the staging directory named after `src`.
    fn staging_path_for(&mut self, src: &Path) -> PathBuf {
        let dir = self.staging_dir();
        let name = src.file_name().map_or_else(|| OsString::from("entry"), |n| n.to_os_string());
        let mut candidate = dir.join(&name);
        let mut attempt = 1u32;
        while self.model.exists(&candidate) {
            let mut alt = name.clone();
            alt.push(format!(".{attempt}"));
            candidate = dir.join(alt);
            attempt += 1;
        }
        candidate
    }

    /// Created on first use, removed once by `finish`.
    fn staging_dir(&mut self) -> PathBuf {
        if let Some(dir) = &self.staging {
            return dir.clone();
        }
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let mut dir = PathBuf::from(format!(".dir_edit.{pid}.{nanos}.tmp"));
        let mut attempt = 1u32;
        while self.model.exists(&dir) {
            dir = PathBuf::from(format!(".dir_edit.{pid}.{nanos}.{attempt}.tmp"));
            attempt += 1;
        }
        let _ = self.model.make_dirs(&dir);
        self.ops.push(Operation::MakeDir(dir.clone()));
        self.protected.insert(dir.clone());
        self.staging = Some(dir.clone());
        dir
    }

    fn finish(mut self) -> Plan {
        let Some(dir) = self.staging.take() else {
            return Plan::new(self.ops, self.warnings, None);
        };
        if self.model.is_empty_dir(&dir) {
            self.model.remove(&dir);
            self.ops.push(Operation::RemoveDir(dir.clone()));
        } else {
            self.warn(format!("keeping staging directory {}", dir.display()));
        }
        Plan::new(self.ops, self.warnings, Some(dir))
    }
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// Deepest directory that is an ancestor of both paths (empty for the root).
fn common_ancestor(a: &Path, b: &Path) -> PathBuf {
    let a_parent = a.parent().unwrap_or(Path::new(""));
    let b_parent = b.parent().unwrap_or(Path::new(""));
    a_parent
        .components()
        .zip(b_parent.components())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.as_os_str())
        .collect()
}
