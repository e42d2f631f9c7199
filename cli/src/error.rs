//! Error type for the `bundlekit` binary.

use bundlekit::ConfigError;
use bundlekit_common::ResolveError;
use thiserror::Error;

/// Errors reported by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The current directory could not be used to find `bundlekit.toml`.
    #[error("cannot locate configuration: {reason}")]
    CurrentDir {
        /// Why the directory was unusable.
        reason: String,
    },

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
