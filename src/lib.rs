//! Core library for `dir_edit`.
//!
//! Turns a before/after pair of path lists into filesystem edits:
//! [`build_mapping`] validates the lists, [`decompose`] splits the renames
//! into chains and cycles, [`plan_operations`] orders them into a [`Plan`],
//! and [`Executor`] applies the plan. [`edit_directory`] runs all four.
//!
//! Listing, file-list and editor helpers used by the binary live in
//! [`listing`], [`filelist`] and [`editor`].

pub mod cli;
pub mod config;
pub mod decompose;
pub mod editor;
pub mod errors;
pub mod exec;
pub mod filelist;
pub mod fs_ops;
pub mod listing;
pub mod mapping;
pub mod output;
pub mod path_key;
pub mod plan;
pub mod platform;
pub mod shutdown;

use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

pub use config::{
    default_config_path, load_config_from_xml, path_has_symlink_ancestor, Config, LogLevel,
    Options,
};
pub use decompose::{decompose, Chain, Cycle, Decomposition};
pub use errors::DirEditError;
pub use exec::{ExecReport, Executor, RunState};
pub use mapping::{build_mapping, Mapping, RemovalSet};
pub use path_key::PathKey;
pub use plan::{plan_operations, Operation, Plan};

/// Convenient result alias for the typed error.
pub type DeResult<T> = std::result::Result<T, DirEditError>;

/// Result of a successful [`edit_directory`] call.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub plan: Plan,
    pub report: ExecReport,
}

/// Apply an edited file list to `root`.
///
/// `before[i]` is renamed to `after[i]`; a blank `after[i]` removes it.
/// Validation errors leave the directory untouched. Verbose lines (and
/// dry-run output) go to `log`.
pub fn edit_directory<S: AsRef<str>>(
    root: &Path,
    before: &[S],
    after: &[S],
    opts: &Options,
    log: &mut dyn Write,
) -> DeResult<Outcome> {
    let (mapping, removals) = build_mapping(root, before, after)?;
    let decomposition = decompose(mapping);
    debug!(
        chains = decomposition.chains.len(),
        cycles = decomposition.cycles.len(),
        removals = removals.len(),
        "Decomposed mapping"
    );

    let plan = plan_operations(root, &decomposition, &removals, opts);
    let report = Executor::new(root, opts).run(&plan, log)?;
    info!(
        applied = report.applied,
        skipped = report.skipped.len() + plan.warnings().len(),
        dry_run = opts.dry_run,
        "Edit finished"
    );
    Ok(Outcome { plan, report })
}

/// Commonly used items for library consumers.
pub mod prelude {
    pub use crate::errors::DirEditError as Error;
    pub use crate::shutdown::request as request_shutdown;
    pub use crate::{
        build_mapping, decompose, default_config_path, edit_directory, plan_operations, Config,
        DeResult, ExecReport, Executor, LogLevel, Operation, Options, Outcome, PathKey, Plan,
        RunState,
    };
}
