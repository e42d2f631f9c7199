//! Subcommand handlers.
//!
//! Handlers write their report to the supplied writer so tests can capture
//! it; the binary passes stdout.

use std::env;
use std::io::Write;

use bundlekit::{SharedConfig, ambient_locale};
use camino::Utf8PathBuf;
use log::debug;

use crate::cli::{CandidatesArgs, ConfigArgs, ResolveArgs};
use crate::error::{CliError, Result};
use crate::output::{
    format_candidates_human, format_candidates_json, format_resource_human, format_resource_json,
};

/// Resolve a bundle and report it.
///
/// Command-line roots, formats, and encoding replace the configured ones.
///
/// # Errors
///
/// Returns an error when configuration fails to load, resolution fails, or
/// the report cannot be written.
pub fn run_resolve(args: &ResolveArgs, stdout: &mut dyn Write) -> Result<()> {
    let mut config = load_config(&args.common)?;
    apply_overrides(&mut config, args);

    let selection = ambient_locale(args.common.locale.as_deref(), &config);
    let resolver = config.directory_resolver()?;
    let resource = resolver.resolve(&args.base_name, selection.locale())?;
    debug!(
        target: "bundlekit::cli",
        "resolved `{}` to {}",
        args.base_name,
        resource.path(),
    );

    let output = if args.common.json {
        format_resource_json(&args.base_name, &selection, &resource)
    } else {
        format_resource_human(&args.base_name, &selection, &resource)
    };
    write_output(stdout, &output)
}

/// Report the candidate locales tried for the selected locale.
///
/// # Errors
///
/// Returns an error when configuration fails to load or the report cannot be
/// written.
pub fn run_candidates(args: &CandidatesArgs, stdout: &mut dyn Write) -> Result<()> {
    let config = load_config(&args.common)?;
    let selection = ambient_locale(args.common.locale.as_deref(), &config);
    let resolver = config.directory_resolver()?;

    let candidates: Vec<String> = resolver
        .candidates_for(selection.locale())
        .iter()
        .map(ToString::to_string)
        .collect();

    let output = if args.common.json {
        format_candidates_json(&selection, &candidates)
    } else {
        format_candidates_human(&selection, &candidates)
    };
    write_output(stdout, &output)
}

fn load_config(args: &ConfigArgs) -> Result<SharedConfig> {
    match args.config.as_deref() {
        Some(path) => Ok(SharedConfig::load_from(path)?),
        None => Ok(SharedConfig::discover(&current_dir()?)?),
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = env::current_dir().map_err(|error| CliError::CurrentDir {
        reason: error.to_string(),
    })?;
    Utf8PathBuf::try_from(cwd).map_err(|error| CliError::CurrentDir {
        reason: format!("current directory is not valid UTF-8: {error}"),
    })
}

fn apply_overrides(config: &mut SharedConfig, args: &ResolveArgs) {
    if !args.root.is_empty() {
        config.roots.clone_from(&args.root);
    }
    if !args.format.is_empty() {
        config.formats.clone_from(&args.format);
    }
    if args.encoding.is_some() {
        config.encoding.clone_from(&args.encoding);
    }
}

fn write_output(stdout: &mut dyn Write, output: &str) -> Result<()> {
    writeln!(stdout, "{output}").map_err(|source| CliError::WriteFailed { source })
}
