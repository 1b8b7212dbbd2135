use std::process::ExitCode;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = dir_edit::cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        // already reported through tracing or output
        Err(_) => ExitCode::FAILURE,
    }
}
