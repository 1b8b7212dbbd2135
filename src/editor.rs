//! Let the user edit a file list with an external editor.
//!
//! The list is written to `file_list.txt` in a private temp directory, the
//! editor runs through the shell and the file is read back. The directory is
//! removed when the call returns, whatever the outcome.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::errors::DirEditError;
use crate::filelist::{mangle_newlines, read_file_list};

/// Run `editor` on `list` and return the edited lines.
pub fn edit_list<S: AsRef<str>>(list: &[S], editor: &str) -> Result<Vec<String>> {
    let dir = tempfile::Builder::new()
        .prefix("dir_edit-")
        .tempdir()
        .context("create temp directory for the file list")?;
    let path = dir.path().join("file_list.txt");

    let mut text = String::new();
    for entry in list {
        text.push_str(&mangle_newlines(entry.as_ref()));
        text.push('\n');
    }
    fs::write(&path, text).with_context(|| format!("write '{}'", path.display()))?;

    let command = editor_command(editor, &path);
    debug!(%command, "Starting editor");
    let status = shell(&command)
        .status()
        .map_err(|e| DirEditError::EditorFailed(format!("{command} ({e})")))?;
    if !status.success() {
        return Err(DirEditError::EditorFailed(command).into());
    }

    read_file_list(&path)
}

#[cfg(not(windows))]
fn editor_command(editor: &str, path: &Path) -> String {
    let p = path.to_string_lossy();
    let quoted = shlex::try_quote(&p).map(|q| q.into_owned()).unwrap_or_else(|_| p.to_string());
    format!("{editor} {quoted}")
}

// Running the text file itself opens the default editor.
#[cfg(windows)]
fn editor_command(editor: &str, path: &Path) -> String {
    let quoted = format!("\"{}\"", path.display());
    if editor.is_empty() {
        quoted
    } else {
        format!("{editor} {quoted}")
    }
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
