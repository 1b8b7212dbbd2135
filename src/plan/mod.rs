//! Operation planning: a linear, ordered list of primitive operations.
//!
//! Execution order is the only correctness mechanism; no dependency graph is
//! kept once the plan is built.

mod model;
mod op;
mod planner;

pub use model::{EntryKind, TreeModel};
pub use op::Operation;
pub use planner::plan_operations;

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    ops: Vec<Operation>,
    warnings: Vec<String>,
    staging: Option<PathBuf>,
}

impl Plan {
    pub(crate) fn new(ops: Vec<Operation>, warnings: Vec<String>, staging: Option<PathBuf>) -> Self {
        Self {
            ops,
            warnings,
            staging,
        }
    }

    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    /// Non-fatal conditions found while planning (skipped removals/renames).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Staging directory used by this plan, relative to the working directory.
    pub fn staging_dir(&self) -> Option<&Path> {
        self.staging.as_deref()
    }

    /// Number of operations with a filesystem effect.
    pub fn effective_len(&self) -> usize {
        self.ops.iter().filter(|op| !op.is_log_only()).count()
    }

    /// One shell command per line, replayable from any directory.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for op in &self.ops {
            out.push_str(&op.render());
            out.push('\n');
        }
        out
    }
}
