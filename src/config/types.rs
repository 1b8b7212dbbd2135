//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - Options is the slice of Config the planner and executor need.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::default_editor;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Warnings and errors (default)
    #[default]
    Normal,
    /// Progress of planning and execution
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" | "warn" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Flags threaded through planning and execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Delete non-empty directories marked for removal.
    pub recursive_remove: bool,
    /// Bare renames only: no automatic parent creation or cleanup.
    pub safe: bool,
    /// Plan and log, but do not touch the filesystem.
    pub dry_run: bool,
    /// Write every operation to the log sink.
    pub verbose: bool,
}

/// Runtime configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shell command used to edit the file list
    pub editor: String,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a diagnostics log file
    pub log_file: Option<PathBuf>,
    /// Remove non-empty directories recursively
    pub remove_recursive: bool,
    /// Disable automatic directory creation/cleanup
    pub safe: bool,
    /// Print actions but do not modify the filesystem
    pub dry_run: bool,
    /// Print each filesystem operation
    pub verbose: bool,
    /// Sink for verbose operation lines; stdout when None
    pub verbose_log: Option<PathBuf>,
    /// Include entries starting with '.'
    pub all: bool,
    /// List the directory recursively
    pub recursive: bool,
    /// Sort by leading numeric value
    pub numeric_sort: bool,
    /// Replace newlines in names by spaces
    pub mangle_newlines: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor: default_editor(),
            log_level: LogLevel::Normal,
            log_file: None,
            remove_recursive: false,
            safe: false,
            dry_run: false,
            verbose: false,
            verbose_log: None,
            all: false,
            recursive: false,
            numeric_sort: false,
            mangle_newlines: false,
        }
    }
}

impl Config {
    /// Flags consumed by the planner and executor.
    pub fn options(&self) -> Options {
        Options {
            recursive_remove: self.remove_recursive,
            safe: self.safe,
            dry_run: self.dry_run,
            verbose: self.verbose,
        }
    }
}
