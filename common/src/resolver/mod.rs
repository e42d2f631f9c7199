//! Resolution of a base name and locale to a decoded resource.
//!
//! The resolver walks the candidate locales for the request (outer loop) and
//! the configured formats (inner loop), returning the first resource that
//! exists. When every pair is missing it asks the [`FallbackPolicy`] for the
//! root locale and tries once more before reporting
//! [`ResolveError::ResourceNotFound`].

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::compiled::CompiledBundles;
use crate::decode::{Decoder, Entries, PropertiesDecoder, XmlPropertiesDecoder};
use crate::error::{ResolveError, Result};
use crate::expansion::DefaultLocaleExpansion;
use crate::fallback::{FallbackPolicy, ResolutionAttempt};
use crate::format::{FormatPreference, FormatSet, ResourceFormat};
use crate::lifetime::{CacheLifetime, CacheLifetimePolicy};
use crate::locale::Locale;
use crate::naming::{bundle_name, resource_name};
use crate::overrides::LocaleOverrideTable;
use crate::provider::StreamProvider;

mod config;

pub use config::{ResolverConfig, ResolverConfigBuilder};


/// A decoded resource and where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedResource {
    format: ResourceFormat,
    locale: Locale,
    path: String,
    entries: Entries,
}

impl ResolvedResource {
    /// Format the resource was decoded from.
    #[must_use]
    pub const fn format(&self) -> ResourceFormat {
        self.format
    }

    /// Candidate locale that produced the resource.
    #[must_use]
    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Provider path, or bundle name for compiled bundles.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// All entries, ordered by key.
    #[must_use]
    pub const fn entries(&self) -> &Entries {
        &self.entries
    }

    /// Value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Consume the resource, keeping only its entries.
    #[must_use]
    pub fn into_entries(self) -> Entries {
        self.entries
    }
}

/// Resolves bundles through a [`StreamProvider`].
///
/// ```
/// use bundlekit_common::testing::MemoryProvider;
/// use bundlekit_common::{Locale, ResolverConfig, ResourceFormat, ResourceResolver};
///
/// let provider = MemoryProvider::new()
///     .with_resource("message.properties", "hello=Hello")
///     .with_resource("message_ja.properties", "hello=\\u3053\\u3093\\u306b\\u3061\\u306f");
/// let resolver = ResourceResolver::new(&ResolverConfig::default(), provider)?;
///
/// let ja_jp: Locale = "ja-JP".parse()?;
/// let resource = resolver.resolve("message", &ja_jp)?;
/// assert_eq!(resource.format(), ResourceFormat::TextProperties);
/// assert_eq!(resource.locale().to_string(), "ja");
/// assert_eq!(resource.get("hello"), Some("こんにちは"));
/// # Ok::<(), bundlekit_common::ResolveError>(())
/// ```
pub struct ResourceResolver<P> {
    provider: P,
    formats: FormatPreference,
    overrides: LocaleOverrideTable,
    fallback: FallbackPolicy,
    lifetime: CacheLifetimePolicy,
    encoding: Option<String>,
    compiled: CompiledBundles,
    properties_decoder: Arc<dyn Decoder>,
    xml_decoder: Arc<dyn Decoder>,
}

impl<P: StreamProvider> ResourceResolver<P> {
    /// Build a resolver from `config`, reading file-backed formats through
    /// `provider`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidFormat`] when the configuration names
    /// formats and none of them is recognised.
    pub fn new(config: &ResolverConfig, provider: P) -> Result<Self> {
        let formats = FormatSet::ordered_formats(config.formats())?;
        debug!(
            target: "bundle::resolver",
            "resolver formats: {}",
            formats.iter().map(ResourceFormat::name).collect::<Vec<_>>().join(", "),
        );

        Ok(Self {
            provider,
            formats,
            overrides: LocaleOverrideTable::new(config.locale_overrides().iter().cloned()),
            fallback: FallbackPolicy,
            lifetime: CacheLifetimePolicy::new(config.cache_lifetime()),
            encoding: config.encoding().map(str::to_owned),
            compiled: CompiledBundles::default(),
            properties_decoder: Arc::new(PropertiesDecoder),
            xml_decoder: Arc::new(XmlPropertiesDecoder),
        })
    }

    /// Bundles consulted for [`ResourceFormat::Compiled`].
    #[must_use]
    pub fn with_compiled(mut self, compiled: CompiledBundles) -> Self {
        self.compiled = compiled;
        self
    }

    /// Candidate expansion for locales without an override.
    #[must_use]
    pub fn with_expansion(mut self, expansion: Arc<dyn DefaultLocaleExpansion>) -> Self {
        self.overrides = self.overrides.expansion(expansion);
        self
    }

    /// Decoder for [`ResourceFormat::TextProperties`].
    #[must_use]
    pub fn with_properties_decoder(mut self, decoder: Arc<dyn Decoder>) -> Self {
        self.properties_decoder = decoder;
        self
    }

    /// Decoder for [`ResourceFormat::XmlProperties`].
    #[must_use]
    pub fn with_xml_decoder(mut self, decoder: Arc<dyn Decoder>) -> Self {
        self.xml_decoder = decoder;
        self
    }

    /// Resolve `base_name` for `locale`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ResourceNotFound`] when neither the candidate
    /// chain nor the root fallback yields a resource. Decoding and provider
    /// failures abort the resolution immediately.
    pub fn resolve(&self, base_name: &str, locale: &Locale) -> Result<ResolvedResource> {
        self.resolve_with(base_name, locale, false)
    }

    /// Resolve like [`ResourceResolver::resolve`], asking the provider to
    /// bypass any transport cache.
    ///
    /// # Errors
    ///
    /// As for [`ResourceResolver::resolve`].
    pub fn resolve_fresh(&self, base_name: &str, locale: &Locale) -> Result<ResolvedResource> {
        self.resolve_with(base_name, locale, true)
    }

    /// Locales tried for `locale`, in order, before any fallback.
    #[must_use]
    pub fn candidates_for(&self, locale: &Locale) -> Vec<Locale> {
        self.overrides.candidates_for(locale)
    }

    /// Formats tried for each candidate, in order.
    #[must_use]
    pub const fn formats(&self) -> &FormatPreference {
        &self.formats
    }

    /// Configured character encoding for text-properties resources.
    #[must_use]
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Lifetime a cache should apply to `base_name` in `locale`.
    #[must_use]
    pub const fn cache_lifetime(&self, base_name: &str, locale: &Locale) -> CacheLifetime {
        self.lifetime.lifetime(base_name, locale)
    }

    /// The lifetime policy as a whole.
    #[must_use]
    pub const fn lifetime_policy(&self) -> &CacheLifetimePolicy {
        &self.lifetime
    }

    /// The underlying stream provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    fn resolve_with(
        &self,
        base_name: &str,
        requested: &Locale,
        force_fresh: bool,
    ) -> Result<ResolvedResource> {
        let mut attempt = ResolutionAttempt::new(base_name, requested);
        let mut target = requested.clone();

        loop {
            let candidates = self.overrides.candidates_for(&target);
            if let Some(resource) = self.try_candidates(base_name, &candidates, force_fresh)? {
                debug!(
                    target: "bundle::resolver",
                    "resolved `{base_name}` for `{requested}` from {} ({})",
                    resource.path,
                    resource.format,
                );
                return Ok(resource);
            }
            target = self.fallback.fallback_locale(base_name, &mut attempt)?;
        }
    }

    fn try_candidates(
        &self,
        base_name: &str,
        candidates: &[Locale],
        force_fresh: bool,
    ) -> Result<Option<ResolvedResource>> {
        for locale in candidates {
            let bundle = bundle_name(base_name, locale);
            for format in self.formats.iter() {
                trace!(target: "bundle::resolver", "trying `{bundle}` as {format}");
                if let Some(resource) = self.load(&bundle, locale, format, force_fresh)? {
                    return Ok(Some(resource));
                }
            }
        }
        Ok(None)
    }

    fn load(
        &self,
        bundle: &str,
        locale: &Locale,
        format: ResourceFormat,
        force_fresh: bool,
    ) -> Result<Option<ResolvedResource>> {
        let Some(extension) = format.extension() else {
            return Ok(self.compiled.get(bundle).map(|entries| ResolvedResource {
                format,
                locale: locale.clone(),
                path: bundle.to_owned(),
                entries: entries.clone(),
            }));
        };

        let Some(path) = resource_name(bundle, extension) else {
            trace!(target: "bundle::resolver", "skipping URL-like bundle name `{bundle}`");
            return Ok(None);
        };

        let stream = self
            .provider
            .open(&path, force_fresh)
            .map_err(|source| ResolveError::Provider {
                path: path.clone(),
                source,
            })?;
        let Some(mut stream) = stream else {
            return Ok(None);
        };

        let entries = self
            .decoder(format)
            .decode(&mut stream, self.encoding.as_deref())
            .map_err(|error| error.at(&path))?;

        Ok(Some(ResolvedResource {
            format,
            locale: locale.clone(),
            path,
            entries,
        }))
    }

    fn decoder(&self, format: ResourceFormat) -> &dyn Decoder {
        match format {
            ResourceFormat::XmlProperties => self.xml_decoder.as_ref(),
            ResourceFormat::Compiled | ResourceFormat::TextProperties => {
                self.properties_decoder.as_ref()
            }
        }
    }
}

impl<P> fmt::Debug for ResourceResolver<P> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ResourceResolver")
            .field("formats", &self.formats)
            .field("overrides", &self.overrides)
            .field("lifetime", &self.lifetime)
            .field("encoding", &self.encoding)
            .field("compiled", &self.compiled.len())
            .finish_non_exhaustive()
    }
}
