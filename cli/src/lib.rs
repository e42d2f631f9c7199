//! Command-line front end for bundlekit.
//!
//! The `bundlekit` binary resolves a bundle the way an application would and
//! prints what it found, or lists the candidate locales tried for a locale.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`commands`] - Subcommand handlers
//! - [`error`] - Error type reported by the binary
//! - [`output`] - Human-readable and JSON rendering

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
