//! `warden` CLI entrypoint.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use warden_cli::error::{CliError, Outcome, Result};
use warden_cli::{Cli, logging, run};

fn main() {
    let cli = Cli::parse();
    if logging::init(cli.verbosity, cli.quiet).is_err() {
        // A logger is already installed; keep using it.
    }

    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr();
    let run_result = current_dir().and_then(|working_dir| run(&cli, &working_dir, &mut stdout));
    if stdout.flush().is_err() {
        // Nothing more can be reported once stdout is gone.
    }
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().map_err(|error| CliError::CurrentDir {
        reason: error.to_string(),
    })?;
    Utf8PathBuf::try_from(cwd).map_err(|error| CliError::CurrentDir {
        reason: format!("path is not valid UTF-8: {error}"),
    })
}

fn exit_code_for_run_result(result: Result<Outcome>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            err.exit_code()
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}
