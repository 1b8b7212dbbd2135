use assert_cmd::cargo;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

/// Temp workspace: `dir/` holds the files to edit, lists live next to it.
fn workspace(files: &[(&str, &str)]) -> (TempDir, PathBuf, PathBuf) {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();
    let dir = base.join("dir");
    fs::create_dir_all(&dir).unwrap();
    for (name, content) in files {
        let p = dir.join(name);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, content).unwrap();
    }
    (td, base, dir)
}

fn write_list(base: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let p = base.join(name);
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(&p, text).unwrap();
    p
}

fn dir_edit(base: &Path, args: &[&str]) -> Output {
    let me = cargo::cargo_bin!("dir_edit");
    Command::new(me)
        .current_dir(base)
        // keep the user's config file out of the way
        .env("DIR_EDIT_CONFIG", base.join("no_such_config.xml"))
        .args(args)
        .output()
        .expect("spawn binary")
}

fn read(p: PathBuf) -> String {
    fs::read_to_string(p).unwrap()
}

#[test]
fn output_list_renames_entries() {
    let (_td, base, dir) = workspace(&[("a", "A"), ("b", "B")]);
    write_list(&base, "after.txt", &["b", "a"]);
    let out = dir_edit(&base, &["dir", "-o", "after.txt"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(read(dir.join("a")), "B");
    assert_eq!(read(dir.join("b")), "A");
    assert!(out.stdout.is_empty(), "quiet unless -v");
}

#[test]
fn dry_run_verbose_prints_commands_only() {
    let (_td, base, dir) = workspace(&[("a", "A"), ("b", "B")]);
    write_list(&base, "after.txt", &["", "c"]);
    let out = dir_edit(&base, &["-dv", "dir", "-o", "after.txt"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[0].starts_with("cd "), "{stdout}");
    assert_eq!(&lines[1..], ["rm a", "mv -n b c"]);
    assert!(dir.join("a").exists() && dir.join("b").exists());
    assert!(!dir.join("c").exists());
}

#[test]
fn verbose_log_goes_to_logfile() {
    let (_td, base, dir) = workspace(&[("a", "A")]);
    write_list(&base, "after.txt", &["sub/a"]);
    let out = dir_edit(&base, &["-v", "-L", "ops.log", "dir", "-o", "after.txt"]);
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
    let log = read(base.join("ops.log"));
    assert!(log.contains("mkdir -p sub\nmv -n a sub/a\n"), "{log}");
    assert_eq!(read(dir.join("sub/a")), "A");
}

#[test]
fn conflicting_list_fails_without_changes() {
    let (_td, base, dir) = workspace(&[("a", "A"), ("b", "B")]);
    write_list(&base, "after.txt", &["c", "c"]);
    let out = dir_edit(&base, &["dir", "-o", "after.txt"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("same destination c for a and b"), "{stderr}");
    assert_eq!(read(dir.join("a")), "A");
    assert_eq!(read(dir.join("b")), "B");
}

#[test]
fn length_mismatch_is_reported() {
    let (_td, base, _dir) = workspace(&[("a", "A"), ("b", "B")]);
    write_list(&base, "after.txt", &["a"]);
    let out = dir_edit(&base, &["dir", "-o", "after.txt"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("different length"), "{stderr}");
}

#[test]
fn dir_must_be_a_directory() {
    let (_td, base, _dir) = workspace(&[("a", "A")]);
    let out = dir_edit(&base, &["dir/a", "-o", "whatever"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("dir/a: Not a directory"), "{stderr}");

    let out = dir_edit(&base, &["missing_dir"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing_dir: "));
}

#[test]
fn empty_directory_has_nothing_to_rename() {
    let (_td, base, _dir) = workspace(&[(".hidden", "H")]);
    write_list(&base, "after.txt", &[]);
    let out = dir_edit(&base, &["dir", "-o", "after.txt"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no valid path given for renaming"));
}

#[test]
fn all_flag_lists_hidden_entries() {
    let (_td, base, dir) = workspace(&[(".hidden", "H"), ("v", "V")]);
    write_list(&base, "after.txt", &["visible_hidden", "v"]);
    let out = dir_edit(&base, &["-a", "dir", "-o", "after.txt"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(read(dir.join("visible_hidden")), "H");
}

#[test]
fn files_arguments_limit_the_list() {
    let (_td, base, dir) = workspace(&[("a", "A"), ("b", "B")]);
    write_list(&base, "after.txt", &["z"]);
    let out = dir_edit(&base, &["dir", "dir/b", "-o", "after.txt"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(read(dir.join("a")), "A");
    assert_eq!(read(dir.join("z")), "B");
}

#[test]
fn missing_file_argument_is_rejected() {
    let (_td, base, _dir) = workspace(&[("a", "A")]);
    write_list(&base, "after.txt", &["z"]);
    let out = dir_edit(&base, &["dir", "dir/nope", "-o", "after.txt"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("nope"));
}

#[test]
fn input_list_entries_are_relative_to_dir() {
    let (_td, base, dir) = workspace(&[("x/1", "one"), ("2", "two")]);
    write_list(&base, "before.txt", &["x/1", "2"]);
    write_list(&base, "after.txt", &["1", "y/2"]);
    let out = dir_edit(&base, &["dir", "-i", "before.txt", "-o", "after.txt"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(read(dir.join("1")), "one");
    assert_eq!(read(dir.join("y/2")), "two");
    assert!(!dir.join("x").exists(), "emptied directory should be pruned");
}

#[test]
fn recursive_numeric_listing_order() {
    let (_td, base, dir) = workspace(&[("d/10 z", "ten"), ("d/9 y", "nine")]);
    // numeric order: "d/9 y", "d/10 z"
    write_list(&base, "after.txt", &["nine", "ten"]);
    let out = dir_edit(&base, &["-rn", "dir", "-o", "after.txt"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(read(dir.join("nine")), "nine");
    assert_eq!(read(dir.join("ten")), "ten");
}

#[test]
fn non_empty_directory_removal_warns() {
    let (_td, base, dir) = workspace(&[("d/f", "F"), ("e", "E")]);
    write_list(&base, "after.txt", &["", "e2"]);
    let out = dir_edit(&base, &["dir", "-o", "after.txt"]);
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("not removing directory d"), "{stderr}");
    assert!(dir.join("d/f").exists());
    assert_eq!(read(dir.join("e2")), "E");

    write_list(&base, "after2.txt", &["", "e2"]);
    let out = dir_edit(&base, &["-R", "dir", "-o", "after2.txt"]);
    assert!(out.status.success());
    assert!(!dir.join("d").exists());
}

#[cfg(unix)]
#[test]
fn editor_command_edits_the_list() {
    let (_td, base, dir) = workspace(&[("a", "A")]);
    let replacement = write_list(&base, "replacement.txt", &["renamed"]);
    let editor = format!("cp {}", replacement.display());
    let out = dir_edit(&base, &["-e", &editor, "dir"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(read(dir.join("renamed")), "A");
}

#[cfg(unix)]
#[test]
fn failing_editor_aborts() {
    let (_td, base, dir) = workspace(&[("a", "A")]);
    let out = dir_edit(&base, &["-e", "false", "dir"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("editor command failed"));
    assert!(dir.join("a").exists());
}

#[cfg(unix)]
#[test]
fn newline_names_need_mangling() {
    let (_td, base, dir) = workspace(&[("bad\nname", "N")]);
    let out = dir_edit(&base, &["-e", "true", "dir"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("newlines are not supported"));

    let out = dir_edit(&base, &["-m", "-e", "true", "dir"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(read(dir.join("bad name")), "N");
}

#[test]
fn version_and_print_config() {
    let (_td, base, _dir) = workspace(&[]);
    let out = dir_edit(&base, &["--version"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));

    let out = dir_edit(&base, &["--print-config"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("no_such_config.xml"));
}
