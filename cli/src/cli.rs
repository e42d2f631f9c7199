//! CLI argument definitions for the `bundlekit` binary.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Resolve localized resource bundles from the command line.
#[derive(Parser, Debug)]
#[command(name = "bundlekit")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Resolve a bundle for Japanese:\n",
    "    $ bundlekit resolve app.messages --locale ja-JP --root resources\n\n",
    "  Only consider XML bundles, printing JSON:\n",
    "    $ bundlekit resolve app.messages --format xml-properties --json\n\n",
    "  Show the locales tried for zh-Hant-TW:\n",
    "    $ bundlekit candidates --locale zh-Hant-TW\n\n",
    "When --locale is omitted, BUNDLEKIT_LOCALE, the `locale` setting in\n",
    "bundlekit.toml, and the system locale are tried in that order.",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Resolve a bundle and print its entries.
    Resolve(ResolveArgs),

    /// List the candidate locales tried for a locale.
    Candidates(CandidatesArgs),
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Configuration file [default: ./bundlekit.toml when present].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Locale to resolve for [default: ambient locale].
    #[arg(short, long, value_name = "TAG")]
    pub locale: Option<String>,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the resolve command.
#[derive(Args, Debug, Clone, Default)]
pub struct ResolveArgs {
    /// Dot-separated bundle name, e.g. `app.messages`.
    #[arg(value_name = "BASE_NAME")]
    pub base_name: String,

    /// Directory to search for resources (repeatable; replaces configured roots).
    #[arg(short, long, value_name = "DIR")]
    pub root: Vec<Utf8PathBuf>,

    /// Format to consider, in priority order (repeatable; replaces configured formats).
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Vec<String>,

    /// Character encoding for text-properties resources.
    #[arg(short, long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Shared options.
    #[command(flatten)]
    pub common: ConfigArgs,
}

/// Arguments for the candidates command.
#[derive(Args, Debug, Clone, Default)]
pub struct CandidatesArgs {
    /// Shared options.
    #[command(flatten)]
    pub common: ConfigArgs,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
