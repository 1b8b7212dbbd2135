//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Flags only ever switch options on; values left unset keep the config/XML value.
//! - --input/--output/--logfile paths are relative to the starting directory.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};

/// Modify contents of DIR using an editor.
///
/// Every line of the edited list is a path in DIR. Change a line to rename
/// the entry, blank it to delete the entry. After saving, the list is checked
/// for consistency, rename loops are detected and the changes are applied.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    author,
    version,
    about = "Rename or remove files in a directory using an editor",
    override_usage = "dir_edit [OPTION]... [DIR] [FILES]..."
)]
pub struct Args {
    /// Directory to edit (default: current directory)
    #[arg(value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Limit to these filenames (default: all non-hidden in directory)
    #[arg(value_name = "FILES", value_hint = ValueHint::AnyPath)]
    pub files: Vec<String>,

    /// Include entries starting with . (besides . and ..)
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Don't perform any file system modifications
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Use CMD to edit the file list (default: $EDITOR or vi)
    #[arg(short = 'e', long, value_name = "CMD")]
    pub editor: Option<String>,

    /// FILE containing paths to be edited (FILES, -a, -n and -r ignored)
    #[arg(short = 'i', long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// FILE containing paths after being edited (-e is ignored)
    #[arg(short = 'o', long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Replace newlines in file names by spaces
    #[arg(short = 'm', long)]
    pub mangle_newlines: bool,

    /// Sort entries according to string numerical value
    #[arg(short = 'n', long)]
    pub numeric_sort: bool,

    /// Remove non-empty directories recursively
    #[arg(short = 'R', long)]
    pub remove_recursive: bool,

    /// List DIR recursively
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Safe mode: no automatic creation or removal of intermediate directories
    #[arg(short = 'S', long)]
    pub safe: bool,

    /// Path to logfile for verbose mode (default: stdout)
    #[arg(short = 'L', long = "logfile", value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub logfile: Option<PathBuf>,

    /// Output filesystem modifications to the logfile
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Set diagnostics log level: quiet, normal, info, debug
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Also write diagnostics to FILE
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit diagnostics in structured JSON
    #[arg(long)]
    pub json: bool,

    /// Print the config file location used by dir_edit and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Directory to edit.
    pub fn dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(editor) = &self.editor {
            cfg.editor = editor.clone();
        }
        if let Some(level) = &self.log_level {
            cfg.log_level = level.clone();
        }
        if let Some(file) = &self.log_file {
            cfg.log_file = Some(file.clone());
        }
        if let Some(file) = &self.logfile {
            cfg.verbose_log = Some(file.clone());
        }
        cfg.all |= self.all;
        cfg.dry_run |= self.dry_run;
        cfg.mangle_newlines |= self.mangle_newlines;
        cfg.numeric_sort |= self.numeric_sort;
        cfg.remove_recursive |= self.remove_recursive;
        cfg.recursive |= self.recursive;
        cfg.safe |= self.safe;
        cfg.verbose |= self.verbose;
    }
}

pub fn parse() -> Args {
    Args::parse()
}
