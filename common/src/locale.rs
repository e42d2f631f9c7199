//! Locale identifiers used to address bundles.
//!
//! [`Locale`] wraps a `unic_langid` identifier so tags are parsed and
//! canonicalised the same way everywhere. The distinguished [`Locale::root`]
//! value addresses the unsuffixed default resource.

use std::fmt;
use std::str::FromStr;

use unic_langid::LanguageIdentifier;
use unic_langid::subtags::{Language, Variant};

use crate::error::{ResolveError, Result};

/// A language/script/region/variant identifier for a bundle.
///
/// Tags are accepted with either `-` or `_` separators, so `ja_JP` and
/// `ja-JP` name the same locale. The empty string, `root`, and `und` all
/// parse to [`Locale::root`].
///
/// ```
/// use bundlekit_common::Locale;
///
/// let locale: Locale = "ja_JP".parse().expect("valid tag");
/// assert_eq!(locale.language(), "ja");
/// assert_eq!(locale.region(), Some("JP"));
/// assert!("root".parse::<Locale>().expect("root tag").is_root());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Locale(LanguageIdentifier);

impl Locale {
    /// The root locale, selecting the resource without a locale suffix.
    ///
    /// Equal to `Locale::default()`.
    #[must_use]
    pub fn root() -> Self {
        Self(LanguageIdentifier::default())
    }

    /// Parse a locale tag.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidLocale`] when the tag is not a valid
    /// language identifier.
    pub fn parse(tag: &str) -> Result<Self> {
        let trimmed = tag.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("root") {
            return Ok(Self::root());
        }

        let normalised = trimmed.replace('_', "-");
        normalised
            .parse::<LanguageIdentifier>()
            .map(Self)
            .map_err(|error| ResolveError::InvalidLocale {
                value: tag.to_owned(),
                reason: error.to_string(),
            })
    }

    /// Whether this is the root locale.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == LanguageIdentifier::default()
    }

    /// Language subtag, or the empty string when it is undetermined.
    #[must_use]
    pub fn language(&self) -> &str {
        if self.0.language == Language::default() {
            ""
        } else {
            self.0.language.as_str()
        }
    }

    /// Script subtag, if any.
    #[must_use]
    pub fn script(&self) -> Option<&str> {
        self.0.script.as_ref().map(|script| script.as_str())
    }

    /// Region subtag, if any.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.0.region.as_ref().map(|region| region.as_str())
    }

    /// Variant subtags in order.
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.0.variants().map(Variant::as_str)
    }

    /// Borrow the underlying language identifier.
    #[must_use]
    pub fn as_language_identifier(&self) -> &LanguageIdentifier {
        &self.0
    }

    /// Copy of this locale keeping only the selected parts.
    ///
    /// `variant_count` keeps that many leading variants.
    pub(crate) fn truncated(&self, keep_script: bool, keep_region: bool, variant_count: usize) -> Self {
        let variants: Vec<Variant> = self.0.variants().take(variant_count).cloned().collect();
        let script = if keep_script { self.0.script.clone() } else { None };
        let region = if keep_region { self.0.region.clone() } else { None };
        Self(LanguageIdentifier::from_parts(
            self.0.language.clone(),
            script,
            region,
            &variants,
        ))
    }

    pub(crate) fn variant_count(&self) -> usize {
        self.0.variants().count()
    }
}

impl From<LanguageIdentifier> for Locale {
    fn from(value: LanguageIdentifier) -> Self {
        Self(value)
    }
}

impl FromStr for Locale {
    type Err = ResolveError;

    fn from_str(input: &str) -> Result<Self> {
        Self::parse(input)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            formatter.write_str("root")
        } else {
            write!(formatter, "{}", self.0)
        }
    }
}

/// One element of an override candidate list.
///
/// `Requested` is a placeholder resolved at lookup time to whichever locale
/// the table was queried for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CandidateLocale {
    /// Substitute the locale that was requested.
    Requested,
    /// Use this locale verbatim.
    Fixed(Locale),
}

impl CandidateLocale {
    /// Tag accepted by [`CandidateLocale::parse`] for the placeholder.
    pub const REQUESTED_TAG: &'static str = "*";

    /// Parse a candidate tag; `*` selects the placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidLocale`] when the tag is neither `*` nor
    /// a valid locale.
    pub fn parse(tag: &str) -> Result<Self> {
        if tag.trim() == Self::REQUESTED_TAG {
            return Ok(Self::Requested);
        }
        Locale::parse(tag).map(Self::Fixed)
    }

    /// Resolve the placeholder against `requested`.
    #[must_use]
    pub fn resolve(&self, requested: &Locale) -> Locale {
        match self {
            Self::Requested => requested.clone(),
            Self::Fixed(locale) => locale.clone(),
        }
    }
}

impl From<Locale> for CandidateLocale {
    fn from(value: Locale) -> Self {
        Self::Fixed(value)
    }
}

impl From<Option<Locale>> for CandidateLocale {
    fn from(value: Option<Locale>) -> Self {
        value.map_or(Self::Requested, Self::Fixed)
    }
}

impl fmt::Display for CandidateLocale {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requested => formatter.write_str(Self::REQUESTED_TAG),
            Self::Fixed(locale) => locale.fmt(formatter),
        }
    }
}
