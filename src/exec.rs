//! Plan execution.
//!
//! Operations run strictly in order, each observing the state left by the
//! previous one. The first OS failure aborts the rest of the plan; nothing is
//! rolled back.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::config::Options;
use crate::errors::DirEditError;
use crate::fs_ops::{self, RenameOutcome};
use crate::plan::{Operation, Plan};
use crate::shutdown;

/// Lifecycle of one plan execution. Failure is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Pending,
    Running,
    Completed,
    Aborted,
}

/// What happened during a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecReport {
    pub state: RunState,
    /// Operations with a filesystem effect that were applied.
    pub applied: usize,
    /// Renames skipped at execution time because the destination existed.
    pub skipped: Vec<String>,
}

pub struct Executor {
    root: PathBuf,
    opts: Options,
    state: RunState,
}

impl Executor {
    pub fn new(root: &Path, opts: &Options) -> Self {
        Self {
            root: root.to_path_buf(),
            opts: *opts,
            state: RunState::Pending,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run `plan` once. Verbose lines go to `log`.
    ///
    /// A second call on the same executor is refused.
    pub fn run(&mut self, plan: &Plan, log: &mut dyn Write) -> Result<ExecReport, DirEditError> {
        if self.state != RunState::Pending {
            debug!(state = ?self.state, "executor reused");
            return Err(DirEditError::ExecutorReused);
        }
        self.state = RunState::Running;

        let mut applied = 0;
        let mut skipped = Vec::new();
        for op in plan.ops() {
            if shutdown::is_requested() {
                self.state = RunState::Aborted;
                warn!(applied, "Interrupted; remaining operations not applied");
                return Err(DirEditError::Interrupted);
            }
            if self.opts.verbose
                && let Err(e) = writeln!(log, "{}", op.render())
            {
                // log sink failures are not fatal
                debug!(error = %e, "Failed to write operation log line");
            }
            if self.opts.dry_run || op.is_log_only() {
                continue;
            }
            match self.apply(op) {
                Ok(Some(msg)) => {
                    warn!("{msg}");
                    skipped.push(msg);
                }
                Ok(None) => {
                    applied += 1;
                    info!(op = %op, "Applied");
                }
                Err(e) => {
                    self.state = RunState::Aborted;
                    let err = DirEditError::FilesystemOperationFailed {
                        operation: op.render(),
                        message: fs_ops::describe_io_error(&e),
                    };
                    error!(code = err.code(), kind = err.kind(), applied, "{err}");
                    return Err(err);
                }
            }
        }

        self.state = RunState::Completed;
        Ok(ExecReport {
            state: self.state,
            applied,
            skipped,
        })
    }

    /// Perform one operation. `Ok(Some(_))` carries a skip warning.
    fn apply(&self, op: &Operation) -> io::Result<Option<String>> {
        let abs = |p: &Path| self.root.join(p);
        match op {
            Operation::ChangeDir(_) => {}
            Operation::Rename { src, dst } => {
                if fs_ops::rename_no_clobber(&abs(src), &abs(dst))? == RenameOutcome::SkippedExisting {
                    return Ok(Some(format!("path {} already exists, skip", dst.display())));
                }
            }
            Operation::MakeDirs(p) => fs_ops::make_dirs(&abs(p))?,
            Operation::MakeDir(p) => fs_ops::make_dir(&abs(p))?,
            Operation::RemoveDir(p) => fs_ops::remove_dir(&abs(p))?,
            Operation::RemoveFile(p) => fs_ops::remove_file(&abs(p))?,
            Operation::RemoveTree(p) => fs_ops::remove_tree(&abs(p))?,
        }
        Ok(None)
    }
}
