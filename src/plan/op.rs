//! Primitive filesystem operations and their shell rendering.

use std::fmt;
use std::path::{Path, PathBuf};

/// One step of a plan. Paths are relative to the working directory, except
/// for `ChangeDir` which carries the absolute directory for the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Log-only marker naming the working directory.
    ChangeDir(PathBuf),
    /// Non-clobbering rename.
    Rename { src: PathBuf, dst: PathBuf },
    /// Create a directory and all missing parents (idempotent).
    MakeDirs(PathBuf),
    /// Create a single directory (used for the staging directory).
    MakeDir(PathBuf),
    /// Remove an empty directory.
    RemoveDir(PathBuf),
    /// Remove a file or symlink.
    RemoveFile(PathBuf),
    /// Remove a directory recursively.
    RemoveTree(PathBuf),
}

impl Operation {
    pub fn command(&self) -> &'static str {
        match self {
            Operation::ChangeDir(_) => "cd",
            Operation::Rename { .. } => "mv -n",
            Operation::MakeDirs(_) => "mkdir -p",
            Operation::MakeDir(_) => "mkdir",
            Operation::RemoveDir(_) => "rmdir",
            Operation::RemoveFile(_) => "rm",
            Operation::RemoveTree(_) => "rm -r",
        }
    }

    pub fn args(&self) -> Vec<&Path> {
        match self {
            Operation::Rename { src, dst } => vec![src.as_path(), dst.as_path()],
            Operation::ChangeDir(p)
            | Operation::MakeDirs(p)
            | Operation::MakeDir(p)
            | Operation::RemoveDir(p)
            | Operation::RemoveFile(p)
            | Operation::RemoveTree(p) => vec![p.as_path()],
        }
    }

    /// Markers carry no filesystem effect.
    pub fn is_log_only(&self) -> bool {
        matches!(self, Operation::ChangeDir(_))
    }

    /// Shell command line for this operation, arguments quoted.
    ///
    /// A `--` separator is inserted when an argument starts with `-` so the
    /// line can be replayed verbatim.
    pub fn render(&self) -> String {
        let args: Vec<String> = self
            .args()
            .into_iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        let sep = if args.iter().any(|a| a.starts_with('-')) { " -- " } else { " " };
        let quoted: Vec<String> = args.iter().map(|a| quote(a)).collect();
        format!("{}{}{}", self.command(), sep, quoted.join(" "))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn quote(arg: &str) -> String {
    shlex::try_quote(arg)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| format!("'{}'", arg.replace('\'', "'\\''")))
}
