//! Resolution core for locale-aware resource bundles.
//!
//! A bundle is addressed by a base name (for example `message`) and a
//! [`Locale`]. The [`ResourceResolver`] walks the candidate locales for the
//! request, tries every configured [`ResourceFormat`] for each candidate, and
//! falls back to [`Locale::root`] exactly once before reporting
//! [`ResolveError::ResourceNotFound`].
//!
//! The policy pieces are independent and can be used on their own:
//!
//! - [`FormatSet`] validates and orders the formats to try;
//! - [`LocaleOverrideTable`] maps a target locale to an explicit candidate
//!   chain and defers to a [`DefaultLocaleExpansion`] otherwise;
//! - [`FallbackPolicy`] guards the single retry against the root locale;
//! - [`CacheLifetimePolicy`] tells a cache such as [`BundleCache`] how long a
//!   resolved bundle stays fresh.

pub mod cache;
pub mod compiled;
pub mod decode;
pub mod error;
pub mod expansion;
pub mod fallback;
pub mod format;
pub mod lifetime;
pub mod locale;
pub mod naming;
pub mod overrides;
pub mod provider;
pub mod resolver;
pub mod selection;
pub mod testing;

pub use cache::BundleCache;
pub use compiled::CompiledBundles;
pub use decode::{
    Charset, DecodeError, Decoder, Entries, PropertiesDecoder, XmlPropertiesDecoder,
};
pub use error::{ResolveError, Result};
pub use expansion::{DefaultLocaleExpansion, StandardExpansion};
pub use fallback::{FallbackPolicy, ResolutionAttempt};
pub use format::{FormatPreference, FormatSet, ResourceFormat};
pub use lifetime::{CacheLifetime, CacheLifetimePolicy};
pub use locale::{CandidateLocale, Locale};
pub use overrides::{LocaleOverrideEntry, LocaleOverrideTable};
pub use provider::{DirectoryProvider, ResourceStream, StreamProvider};
pub use resolver::{ResolvedResource, ResolverConfig, ResolverConfigBuilder, ResourceResolver};
pub use selection::{LOCALE_ENV_VAR, LocaleSelection, LocaleSource, normalise_locale, select_locale};
