//! Decompose an injective mapping into rename chains and rename cycles.
//!
//! Walks start from sources that are nobody's destination; whatever remains
//! afterwards consists of cycles only. Every edge is consumed exactly once
//! from a scratch copy owned by `decompose`.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::mapping::Mapping;
use crate::path_key::PathKey;

/// `[p0, .., pn]` with `p0` free of inbound edges and `pn` free of outbound ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain(Vec<PathKey>);

/// `[p0, .., pk]` where `pk` is `p0` under case folding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle(Vec<PathKey>);

impl Chain {
    pub fn keys(&self) -> &[PathKey] {
        &self.0
    }

    /// `(src, dst)` pairs, head first.
    pub fn edges(&self) -> impl DoubleEndedIterator<Item = (&PathKey, &PathKey)> {
        self.0.windows(2).map(|w| (&w[0], &w[1]))
    }
}

impl Cycle {
    pub fn keys(&self) -> &[PathKey] {
        &self.0
    }

    pub fn edges(&self) -> impl DoubleEndedIterator<Item = (&PathKey, &PathKey)> {
        self.0.windows(2).map(|w| (&w[0], &w[1]))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decomposition {
    pub chains: Vec<Chain>,
    pub cycles: Vec<Cycle>,
}

impl Decomposition {
    pub fn edge_count(&self) -> usize {
        let chain_edges: usize = self.chains.iter().map(|c| c.0.len() - 1).sum();
        let cycle_edges: usize = self.cycles.iter().map(|c| c.0.len() - 1).sum();
        chain_edges + cycle_edges
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty() && self.cycles.is_empty()
    }
}

/// Consume `mapping` and split it into chains and cycles.
///
/// Extraction order follows the mapping's sorted order, so the result is
/// deterministic for a given input.
pub fn decompose(mapping: Mapping) -> Decomposition {
    let mut scratch: BTreeMap<PathKey, PathKey> = mapping.into_edges();
    let targets: BTreeSet<&PathKey> = scratch.values().collect();
    let mut starts: Vec<PathKey> = scratch
        .keys()
        .filter(|k| !targets.contains(k))
        .cloned()
        .collect();
    drop(targets);
    starts.reverse();

    let mut out = Decomposition::default();
    loop {
        let start = match starts.pop() {
            Some(s) => s,
            None => match scratch.keys().next() {
                Some(k) => k.clone(),
                None => break,
            },
        };

        let mut walk = vec![start.clone()];
        let mut cur = start;
        while let Some(next) = scratch.remove(&cur) {
            walk.push(next.clone());
            cur = next;
        }

        let closes = match (walk.first(), walk.last()) {
            (Some(first), Some(last)) => first.same_entry_as(last),
            _ => false,
        };
        if closes {
            debug!(start = %walk[0], len = walk.len() - 1, "rename cycle");
            out.cycles.push(Cycle(walk));
        } else {
            debug!(start = %walk[0], len = walk.len() - 1, "rename chain");
            out.chains.push(Chain(walk));
        }
    }
    out
}
