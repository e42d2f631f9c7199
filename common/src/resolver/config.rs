//! Immutable resolver configuration and its builder.

use crate::lifetime::CacheLifetime;
use crate::overrides::LocaleOverrideEntry;

/// Settings a [`super::ResourceResolver`] is built from.
///
/// Formats are kept as names so that validation (and the warning for
/// unrecognised names) happens once, when the resolver is constructed.
///
/// ```
/// use bundlekit_common::{CacheLifetime, Locale, LocaleOverrideEntry, ResolverConfig};
///
/// let ja: Locale = "ja".parse().expect("valid locale");
/// let en_us: Locale = "en-US".parse().expect("valid locale");
///
/// let mut builder = ResolverConfig::builder();
/// builder
///     .encoding("UTF-8")
///     .format("xml-properties")
///     .format("text-properties")
///     .locale_override(LocaleOverrideEntry::new(ja, [en_us]).with_requested())
///     .cache_lifetime(CacheLifetime::NeverCache);
/// let config = builder.build();
///
/// assert_eq!(config.encoding(), Some("UTF-8"));
/// assert_eq!(config.formats(), ["xml-properties", "text-properties"]);
/// assert_eq!(config.locale_overrides().len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    encoding: Option<String>,
    formats: Vec<String>,
    locale_overrides: Vec<LocaleOverrideEntry>,
    cache_lifetime: CacheLifetime,
}

impl ResolverConfig {
    /// Returns a builder with no encoding, every format, no overrides, and
    /// a never-expiring cache lifetime.
    #[must_use]
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }

    /// Character encoding for text-properties resources.
    #[must_use]
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Requested format names in priority order; empty means all formats.
    #[must_use]
    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    /// Override entries in registration order.
    #[must_use]
    pub fn locale_overrides(&self) -> &[LocaleOverrideEntry] {
        &self.locale_overrides
    }

    /// Lifetime handed to caches for every resolved bundle.
    #[must_use]
    pub const fn cache_lifetime(&self) -> CacheLifetime {
        self.cache_lifetime
    }
}

/// Accumulates [`ResolverConfig`] settings.
///
/// Formats and overrides append in call order.
#[derive(Clone, Debug, Default)]
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    /// Character encoding for text-properties resources.
    pub fn encoding(&mut self, encoding: impl Into<String>) -> &mut Self {
        self.config.encoding = Some(encoding.into());
        self
    }

    /// Append one format name.
    pub fn format(&mut self, format: impl Into<String>) -> &mut Self {
        self.config.formats.push(format.into());
        self
    }

    /// Append several format names.
    pub fn formats<I, S>(&mut self, formats: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.formats.extend(formats.into_iter().map(Into::into));
        self
    }

    /// Append a candidate override.
    pub fn locale_override(&mut self, entry: LocaleOverrideEntry) -> &mut Self {
        self.config.locale_overrides.push(entry);
        self
    }

    /// Cache lifetime reported for resolved bundles.
    pub fn cache_lifetime(&mut self, lifetime: CacheLifetime) -> &mut Self {
        self.config.cache_lifetime = lifetime;
        self
    }

    /// Snapshot the accumulated settings.
    #[must_use]
    pub fn build(&self) -> ResolverConfig {
        self.config.clone()
    }
}
