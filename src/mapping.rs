//! Build a validated rename mapping from paired before/after lists.
//!
//! Rules:
//! - Lists must have equal length (checked first) and must not be empty.
//! - A blank after-entry marks the source for removal.
//! - Sources and destinations must be unique; conflicts name both entries.
//! - Entries equal before and after normalization are dropped as no-ops.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::debug;

use crate::errors::DirEditError;
use crate::path_key::PathKey;

/// Ordered list of sources to delete.
pub type RemovalSet = Vec<PathKey>;

/// Injective `src -> dst` mapping without self-maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    edges: BTreeMap<PathKey, PathKey>,
}

impl Mapping {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn get(&self, src: &PathKey) -> Option<&PathKey> {
        self.edges.get(src)
    }

    /// Edges in stable (sorted by source) order.
    pub fn iter(&self) -> impl Iterator<Item = (&PathKey, &PathKey)> {
        self.edges.iter()
    }

    pub(crate) fn into_edges(self) -> BTreeMap<PathKey, PathKey> {
        self.edges
    }
}

/// Validate `before`/`after` and split them into renames and removals.
pub fn build_mapping<S: AsRef<str>>(
    root: &Path,
    before: &[S],
    after: &[S],
) -> Result<(Mapping, RemovalSet), DirEditError> {
    if before.len() != after.len() {
        return Err(DirEditError::LengthMismatch {
            before: before.len(),
            after: after.len(),
        });
    }
    if before.is_empty() {
        return Err(DirEditError::EmptyInputList);
    }

    let mut edges = BTreeMap::new();
    let mut removals = RemovalSet::new();
    // case-folded key -> raw source that claimed it
    let mut src_seen: HashMap<String, &str> = HashMap::new();
    let mut dst_seen: HashMap<String, &str> = HashMap::new();

    for (raw_src, raw_dst) in before.iter().zip(after.iter()) {
        let (raw_src, raw_dst) = (raw_src.as_ref(), raw_dst.as_ref());
        let src = PathKey::resolve(root, raw_src)?;
        if let Some(first) = src_seen.get(src.case_folded()) {
            return Err(DirEditError::DuplicateSource {
                first: (*first).to_owned(),
                second: raw_src.to_owned(),
            });
        }
        src_seen.insert(src.case_folded().to_owned(), raw_src);

        if raw_dst.is_empty() {
            removals.push(src);
            continue;
        }

        let dst = PathKey::resolve(root, raw_dst)?;
        if let Some(first_src) = dst_seen.get(dst.case_folded()) {
            return Err(DirEditError::DuplicateDestination {
                dst: raw_dst.to_owned(),
                first: (*first_src).to_owned(),
                second: raw_src.to_owned(),
            });
        }
        dst_seen.insert(dst.case_folded().to_owned(), raw_src);

        if src == dst {
            debug!(path = %src, "unchanged entry, nothing to do");
            continue;
        }
        edges.insert(src, dst);
    }

    debug!(renames = edges.len(), removals = removals.len(), "mapping built");
    Ok((Mapping { edges }, removals))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> PathKey {
        PathKey::from_relative(s)
    }

    fn build(before: &[&str], after: &[&str]) -> Result<(Mapping, RemovalSet), DirEditError> {
        build_mapping(Path::new("/work"), before, after)
    }

    #[test]
    fn length_mismatch_checked_first() {
        // Duplicate sources would also be an error; length wins.
        let err = build(&["a", "a"], &["b"]).unwrap_err();
        assert!(matches!(err, DirEditError::LengthMismatch { before: 2, after: 1 }));
    }

    #[test]
    fn empty_lists_are_rejected() {
        let err = build(&[], &[]).unwrap_err();
        assert!(matches!(err, DirEditError::EmptyInputList));
    }

    #[test]
    fn blanks_become_removals_in_order() {
        let (m, removals) = build(&["a", "b", "c"], &["", "x", ""]).unwrap();
        assert_eq!(removals, vec![key("a"), key("c")]);
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(&key("b")), Some(&key("x")));
    }

    #[test]
    fn self_maps_are_dropped() {
        let (m, removals) = build(&["a", "b", "./c"], &["a", "d", "c/"]).unwrap();
        assert!(removals.is_empty());
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(&key("b")), Some(&key("d")));
    }

    #[test]
    fn duplicate_source_names_both_entries() {
        let err = build(&["c2", "./c2"], &["d2", "d2"]).unwrap_err();
        match err {
            DirEditError::DuplicateSource { first, second } => {
                assert_eq!(first, "c2");
                assert_eq!(second, "./c2");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[cfg(any(target_os = "macos", windows))]
    #[test]
    fn sources_differing_in_case_collide() {
        let err = build(&["a", "A"], &["x", "y"]).unwrap_err();
        assert!(matches!(err, DirEditError::DuplicateSource { first, second } if first == "a" && second == "A"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn sources_differing_in_case_are_distinct_on_linux() {
        let (m, _) = build(&["a", "A"], &["x", "y"]).unwrap();
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn duplicate_destination_names_both_sources() {
        let err = build(&["a1", "a2"], &["b", "b"]).unwrap_err();
        match err {
            DirEditError::DuplicateDestination { dst, first, second } => {
                assert_eq!(dst, "b");
                assert_eq!(first, "a1");
                assert_eq!(second, "a2");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn self_map_still_claims_its_destination() {
        let err = build(&["a", "b"], &["a", "a"]).unwrap_err();
        assert!(matches!(err, DirEditError::DuplicateDestination { .. }));
    }

    #[test]
    fn outside_paths_are_rejected() {
        let err = build(&["a"], &["../b"]).unwrap_err();
        assert!(matches!(err, DirEditError::OutsideDirectory(p) if p == "../b"));
        let err = build(&["/tmp/elsewhere"], &["b"]).unwrap_err();
        assert!(matches!(err, DirEditError::OutsideDirectory(_)));
    }
}
