//! Typed error definitions for dir_edit.
//! Validation failures happen before any filesystem mutation; execution
//! failures abort the remaining plan and leave earlier operations applied.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirEditError {
    #[error("new file list has different length than old ({after} vs {before} entries)")]
    LengthMismatch { before: usize, after: usize },

    #[error("no valid path given for renaming")]
    EmptyInputList,

    #[error("duplicate input entries {first} and {second} (identical entries are not allowed)")]
    DuplicateSource { first: String, second: String },

    #[error("same destination {dst} for {first} and {second}")]
    DuplicateDestination {
        dst: String,
        first: String,
        second: String,
    },

    #[error("path {0} leads outside given directory")]
    OutsideDirectory(String),

    #[error("file names with newlines are not supported, try -m: {0:?}")]
    UnsupportedNewlineInName(String),

    #[error("{operation}: {message}")]
    FilesystemOperationFailed { operation: String, message: String },

    #[error("executor already ran a plan")]
    ExecutorReused,

    #[error("editor command failed: {0}")]
    EditorFailed(String),

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl DirEditError {
    /// Stable numeric code, logged as a structured field.
    pub fn code(&self) -> u16 {
        match self {
            DirEditError::LengthMismatch { .. } => 10,
            DirEditError::EmptyInputList => 11,
            DirEditError::DuplicateSource { .. } => 12,
            DirEditError::DuplicateDestination { .. } => 13,
            DirEditError::OutsideDirectory(_) => 14,
            DirEditError::UnsupportedNewlineInName(_) => 15,
            DirEditError::FilesystemOperationFailed { .. } => 20,
            DirEditError::ExecutorReused => 21,
            DirEditError::EditorFailed(_) => 30,
            DirEditError::Interrupted => 130,
        }
    }

    /// True for errors raised before the filesystem was touched.
    pub fn is_validation(&self) -> bool {
        self.code() < 20
    }

    /// Short machine-friendly kind, used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DirEditError::LengthMismatch { .. } => "length_mismatch",
            DirEditError::EmptyInputList => "empty_input_list",
            DirEditError::DuplicateSource { .. } => "duplicate_source",
            DirEditError::DuplicateDestination { .. } => "duplicate_destination",
            DirEditError::OutsideDirectory(_) => "outside_directory",
            DirEditError::UnsupportedNewlineInName(_) => "unsupported_newline",
            DirEditError::FilesystemOperationFailed { .. } => "filesystem_operation_failed",
            DirEditError::ExecutorReused => "executor_reused",
            DirEditError::EditorFailed(_) => "editor_failed",
            DirEditError::Interrupted => "interrupted",
        }
    }
}
