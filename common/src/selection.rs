//! Choice of the ambient default locale.
//!
//! Callers that do not pass a locale explicitly fall back, in order, to the
//! `BUNDLEKIT_LOCALE` environment variable, the configured locale, and the
//! operating-system locale. Unparseable candidates are skipped with a
//! warning; when nothing usable remains the root locale is selected.

use std::fmt;

use log::{debug, warn};

use crate::locale::Locale;

/// Environment variable consulted for the ambient locale.
pub const LOCALE_ENV_VAR: &str = "BUNDLEKIT_LOCALE";

/// Source for a selected locale.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LocaleSource {
    /// Locale supplied explicitly by the caller.
    ExplicitArgument,
    /// Locale sourced from the `BUNDLEKIT_LOCALE` environment variable.
    EnvironmentVariable,
    /// Locale taken from `bundlekit.toml`.
    Configuration,
    /// Locale reported by the operating system.
    System,
    /// No usable candidate; the root locale.
    Root,
}

impl fmt::Display for LocaleSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExplicitArgument => formatter.write_str("explicit locale"),
            Self::EnvironmentVariable => formatter.write_str(LOCALE_ENV_VAR),
            Self::Configuration => formatter.write_str("configuration locale"),
            Self::System => formatter.write_str("system locale"),
            Self::Root => formatter.write_str("root locale"),
        }
    }
}

/// Selected locale and where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleSelection {
    locale: Locale,
    source: LocaleSource,
    requested: Option<String>,
}

impl LocaleSelection {
    const fn new(locale: Locale, source: LocaleSource, requested: Option<String>) -> Self {
        Self {
            locale,
            source,
            requested,
        }
    }

    /// Returns the effective locale source.
    #[must_use]
    pub const fn source(&self) -> LocaleSource {
        self.source
    }

    /// Returns the raw tag supplied by the winning source, if any.
    #[must_use]
    pub fn requested(&self) -> Option<&str> {
        self.requested.as_deref()
    }

    /// Returns the selected locale.
    #[must_use]
    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Whether no candidate was usable.
    #[must_use]
    pub const fn used_root(&self) -> bool {
        matches!(self.source, LocaleSource::Root)
    }

    /// Consumes the selection, yielding the locale.
    #[must_use]
    pub fn into_locale(self) -> Locale {
        self.locale
    }

    /// Emit a debug log summarising the selection.
    pub fn log_outcome(&self, target: &str) {
        debug!(target: target, "selected {} `{}`", self.source, self.locale);
    }
}

fn try_candidate(source: LocaleSource, raw: Option<&str>) -> Option<LocaleSelection> {
    let candidate = normalise_locale(raw)?;

    match Locale::parse(candidate) {
        Ok(locale) => Some(LocaleSelection::new(locale, source, Some(candidate.to_owned()))),
        Err(error) => {
            warn!(
                target: "bundle::selection",
                "skipping unusable {source} `{candidate}`: {error}",
            );
            None
        }
    }
}

/// Select the ambient locale.
///
/// Candidates are considered in this order:
///
/// 1. The explicit locale supplied by the caller.
/// 2. The `BUNDLEKIT_LOCALE` environment variable.
/// 3. The configuration (`bundlekit.toml`).
/// 4. The operating-system locale.
/// 5. [`Locale::root`] when no candidate parses.
#[must_use]
pub fn select_locale(
    explicit: Option<&str>,
    environment: Option<String>,
    configuration: Option<&str>,
    system: Option<String>,
) -> LocaleSelection {
    let candidates = [
        (LocaleSource::ExplicitArgument, explicit),
        (LocaleSource::EnvironmentVariable, environment.as_deref()),
        (LocaleSource::Configuration, configuration),
        (LocaleSource::System, system.as_deref()),
    ];

    candidates
        .into_iter()
        .find_map(|(source, raw)| try_candidate(source, raw))
        .unwrap_or_else(|| LocaleSelection::new(Locale::root(), LocaleSource::Root, None))
}

/// Trim whitespace and discard empty locale candidates.
#[must_use]
pub fn normalise_locale(input: Option<&str>) -> Option<&str> {
    input
        .map(str::trim)
        .and_then(|value| if value.is_empty() { None } else { Some(value) })
}
