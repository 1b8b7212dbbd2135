//! Application orchestrator.
//! Loads/merges config, initializes logging, installs signal handlers, builds
//! the before/after lists and applies them to the directory.

use anyhow::{Context, Result, anyhow, bail};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, warn};

use dir_edit::cli::Args;
use dir_edit::config::CONFIG_ENV;
use dir_edit::filelist::{check_file_list, check_newlines, read_file_list, resolve_file_args};
use dir_edit::listing::{read_dir_flat, read_dir_recursive, sort_paths};
use dir_edit::output as out;
use dir_edit::{
    default_config_path, edit_directory, editor, load_config_from_xml, shutdown, Config,
    DirEditError,
};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    // Build config: defaults, then XML, then CLI (CLI wins).
    let mut cfg = Config::default();
    match load_config_from_xml() {
        Ok(Some((path, xml))) => {
            xml.apply_to(&mut cfg);
            debug!("Applied config from {}", path.display());
        }
        Ok(None) => {}
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            return Err(e);
        }
    }
    args.apply_overrides(&mut cfg);

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        if let Err(e) = ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; stopping before the next operation...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take(); // drop guard here to flush tracing_appender
            }
        }) {
            warn!(error = %e, "Failed to install signal handler");
        }
    }

    debug!("Starting dir_edit: {:?}", args);

    let result = edit(&args, &cfg).inspect_err(report_error);

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}

fn print_config_location() {
    if let Ok(cfg_env) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {cfg_env}"));
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("Default dir_edit config path:\n  {}", p.display()));
            if !p.exists() {
                out::print_info("No config file exists there yet; built-in defaults are used.");
            }
        }
        None => out::print_error("Could not determine a default config path"),
    }
}

fn report_error(e: &anyhow::Error) {
    match e.downcast_ref::<DirEditError>() {
        Some(de) if de.is_validation() => {
            error!(code = de.code(), kind = de.kind(), "{de} (nothing was changed)")
        }
        Some(de) => error!(code = de.code(), kind = de.kind(), "{de}"),
        None => error!("{e:#}"),
    }
}

fn edit(args: &Args, cfg: &Config) -> Result<()> {
    let orig_cwd = dunce::canonicalize(std::env::current_dir().context("current directory")?)
        .context("current directory")?;
    let root = open_root(&args.dir())?;
    debug!(root = %root.display(), "Editing directory");

    let before = input_list(args, cfg, &root, &orig_cwd)?;
    let after = match &args.output {
        Some(path) => read_file_list(&orig_cwd.join(path))?,
        None => editor::edit_list(&before, &cfg.editor)?,
    };
    if shutdown::is_requested() {
        return Err(DirEditError::Interrupted.into());
    }

    let mut sink: Box<dyn Write> = match &cfg.verbose_log {
        Some(path) => {
            let path = orig_cwd.join(path);
            Box::new(File::create(&path).with_context(|| format!("{}: cannot open logfile", path.display()))?)
        }
        None => Box::new(io::stdout().lock()),
    };

    let outcome = edit_directory(&root, &before, &after, &cfg.options(), &mut sink)?;
    sink.flush().context("flush verbose log")?;
    debug!(
        ops = outcome.plan.ops().len(),
        applied = outcome.report.applied,
        "Done"
    );
    Ok(())
}

/// Canonical form of DIR, which must be a directory.
fn open_root(dir: &Path) -> Result<PathBuf> {
    let root = dunce::canonicalize(dir).map_err(|e| anyhow!("{}: {}", dir.display(), e))?;
    if !root.is_dir() {
        bail!("{}: Not a directory", dir.display());
    }
    Ok(root)
}

/// The list handed to the editor: --input file, FILES, or a directory listing.
fn input_list(args: &Args, cfg: &Config, root: &Path, orig_cwd: &Path) -> Result<Vec<String>> {
    let list = if let Some(input) = &args.input {
        let list = read_file_list(&orig_cwd.join(input))?;
        check_file_list(root, &list)?;
        list
    } else if !args.files.is_empty() {
        let list = resolve_file_args(orig_cwd, &args.files);
        check_file_list(root, &list)?;
        list
    } else {
        let mut list = if cfg.recursive {
            read_dir_recursive(root, cfg.all)?
        } else {
            read_dir_flat(root, cfg.all)?
        };
        sort_paths(&mut list, cfg.numeric_sort);
        list
    };
    if list.is_empty() {
        return Err(DirEditError::EmptyInputList.into());
    }
    check_newlines(&list, cfg.mangle_newlines)?;
    Ok(list)
}
