//! `bundlekit` CLI entrypoint.
//!
//! Resolves localized resource bundles from the command line. Reports go to
//! stdout; errors go to stderr with a non-zero exit code.

use std::error::Error;
use std::io::Write;

use bundlekit_cli::cli::{Cli, Command};
use bundlekit_cli::commands::{run_candidates, run_resolve};
use bundlekit_cli::error::Result;
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Command::Resolve(args) => run_resolve(args, stdout),
        Command::Candidates(args) => run_candidates(args, stdout),
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            let mut source = err.source();
            while let Some(cause) = source {
                write_stderr_line(stderr, format!("  caused by: {cause}"));
                source = cause.source();
            }
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}
