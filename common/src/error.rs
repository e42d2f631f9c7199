//! Error types for bundle resolution.
//!
//! Every failure the resolver can report is a variant of [`ResolveError`].
//! Configuration problems (`InvalidFormat`, `InvalidLocale`,
//! `InvalidCacheLifetime`) surface when a resolver is built; the remaining
//! variants surface from [`crate::ResourceResolver::resolve`].

use std::io;

use thiserror::Error;

use crate::locale::Locale;

/// Errors raised while configuring or running a resolver.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// None of the requested format names is recognised.
    #[error(
        "unknown resource format(s) {requested:?}; expected compiled, text-properties, or xml-properties"
    )]
    InvalidFormat {
        /// The format names supplied by the caller.
        requested: Vec<String>,
    },

    /// The configured character encoding name is not recognised.
    #[error("unsupported character encoding `{name}` while decoding {path}")]
    UnsupportedEncoding {
        /// The encoding label that failed to resolve.
        name: String,
        /// Resource path being decoded.
        path: String,
    },

    /// A resource was found but its bytes do not match the declared format.
    #[error("failed to decode {path}: {reason}")]
    Decode {
        /// Resource path being decoded.
        path: String,
        /// Description of the malformed input.
        reason: String,
    },

    /// No candidate locale or format produced a resource, including the root
    /// fallback.
    #[error(
        "no resource for base name `{base_name}` and locale `{locale}`; check the base name and the resource file names"
    )]
    ResourceNotFound {
        /// Base name passed to the resolver.
        base_name: String,
        /// Locale originally requested by the caller.
        locale: Locale,
    },

    /// The stream provider failed for a reason other than "not found".
    #[error("failed to open {path}")]
    Provider {
        /// Resource path the provider was asked for.
        path: String,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A locale tag could not be parsed.
    #[error("invalid locale `{value}`: {reason}")]
    InvalidLocale {
        /// The rejected tag.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A cache lifetime setting could not be parsed.
    #[error("invalid cache lifetime `{value}`; expected never-expire, never-cache, or milliseconds")]
    InvalidCacheLifetime {
        /// The rejected setting.
        value: String,
    },
}

impl ResolveError {
    /// Whether the error reports a missing resource rather than a failure
    /// while reading one.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }
}

/// Result alias for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;
