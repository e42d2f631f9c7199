//! File-backed resolver configuration.
//!
//! Settings live in `bundlekit.toml`:
//!
//! ```toml
//! encoding = "UTF-8"
//! formats = ["text-properties", "xml-properties"]
//! cache_lifetime = "never-expire"   # or "never-cache", or milliseconds
//! locale = "ja-JP"
//! roots = ["resources"]
//!
//! [[locale_overrides]]
//! target = "ja"
//! candidates = ["en-US", "*", "root"]
//! ```
//!
//! `SharedConfig` mirrors the file one-to-one; [`SharedConfig::resolver_config`]
//! validates it and produces the immutable [`ResolverConfig`] the resolver is
//! built from.

use std::fs;
use std::io;

use bundlekit_common::selection::normalise_locale;
use bundlekit_common::{
    CacheLifetime, CandidateLocale, DirectoryProvider, Locale, LocaleOverrideEntry, ResolveError,
    ResolverConfig, ResourceResolver,
};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// Conventional configuration file name.
pub const CONFIG_FILE_NAME: &str = "bundlekit.toml";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}")]
    Read {
        /// File that was being read.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid TOML for this schema.
    #[error("failed to parse configuration {origin}")]
    Parse {
        /// File name, or `<inline>` for string input.
        origin: String,
        /// Parser diagnostic.
        #[source]
        source: Box<toml::de::Error>,
    },

    /// A value parsed but is not meaningful.
    #[error("invalid `{field}` setting")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Validation failure.
        #[source]
        source: ResolveError,
    },
}

/// Cache lifetime as written in the file: a name or a millisecond count.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
pub enum CacheLifetimeSetting {
    /// Milliseconds before a cached bundle goes stale.
    Millis(u64),
    /// `never-expire` or `never-cache`.
    Named(String),
}

impl CacheLifetimeSetting {
    /// Interpret the setting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for names other than `never-expire`
    /// and `never-cache`.
    pub fn to_lifetime(&self) -> Result<CacheLifetime, ConfigError> {
        match self {
            Self::Millis(millis) => Ok(CacheLifetime::from_millis(*millis)),
            Self::Named(name) => {
                name.parse::<CacheLifetime>()
                    .map_err(|source| ConfigError::Invalid {
                        field: "cache_lifetime",
                        source,
                    })
            }
        }
    }
}

impl Default for CacheLifetimeSetting {
    fn default() -> Self {
        Self::Named(CacheLifetime::NEVER_EXPIRE.to_owned())
    }
}

/// One `[[locale_overrides]]` table.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LocaleOverrideConfig {
    /// Locale the override applies to.
    pub target: String,
    /// Candidates in lookup order; `*` stands for the requested locale.
    #[serde(default)]
    pub candidates: Vec<String>,
}

impl LocaleOverrideConfig {
    /// Parse the tags into an override entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a tag does not parse.
    pub fn to_entry(&self) -> Result<LocaleOverrideEntry, ConfigError> {
        let invalid = |source| ConfigError::Invalid {
            field: "locale_overrides",
            source,
        };
        let target = Locale::parse(&self.target).map_err(invalid)?;
        let candidates = self
            .candidates
            .iter()
            .map(|tag| CandidateLocale::parse(tag))
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;
        Ok(LocaleOverrideEntry::new(target, candidates))
    }
}

/// Contents of `bundlekit.toml`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SharedConfig {
    /// Character encoding for text-properties resources. ISO-8859-1 when
    /// absent.
    pub encoding: Option<String>,
    /// Format names in priority order; empty selects every format.
    pub formats: Vec<String>,
    /// How long resolved bundles stay cached.
    pub cache_lifetime: CacheLifetimeSetting,
    /// Preferred locale when neither the caller nor `BUNDLEKIT_LOCALE`
    /// supplies one. Blank values are ignored.
    pub locale: Option<String>,
    /// Directories searched for resources, in order. Relative entries are
    /// resolved against the configuration file's directory by
    /// [`SharedConfig::load_from`].
    pub roots: Vec<Utf8PathBuf>,
    /// Per-locale candidate overrides in registration order.
    pub locale_overrides: Vec<LocaleOverrideConfig>,
}

impl SharedConfig {
    /// Parse configuration from TOML text.
    ///
    /// ```
    /// use bundlekit::SharedConfig;
    ///
    /// let config = SharedConfig::from_toml_str("formats = [\"xml-properties\"]\n")?;
    /// assert_eq!(config.formats, ["xml-properties"]);
    /// # Ok::<(), bundlekit::ConfigError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown fields.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Self::parse(source, "<inline>")
    }

    /// Read and parse `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it does not parse.
    pub fn load_from(path: &Utf8Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |file| fs::read_to_string(file))
    }

    /// Read and parse `path` through `reader`.
    ///
    /// Exists so tests can supply file contents without touching the file
    /// system.
    ///
    /// ```
    /// use bundlekit::SharedConfig;
    /// use camino::Utf8Path;
    ///
    /// let config = SharedConfig::load_with(Utf8Path::new("conf/bundlekit.toml"), |_| {
    ///     Ok(String::from("roots = [\"strings\"]\n"))
    /// })?;
    /// assert_eq!(config.roots, ["conf/strings"]);
    /// # Ok::<(), bundlekit::ConfigError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// As for [`SharedConfig::load_from`].
    pub fn load_with<F>(path: &Utf8Path, reader: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&Utf8Path) -> io::Result<String>,
    {
        let source = reader(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let mut config = Self::parse(&source, path.as_str())?;

        if let Some(base) = path.parent() {
            for root in &mut config.roots {
                if root.is_relative() {
                    *root = base.join(&*root);
                }
            }
        }

        debug!(target: "bundlekit::config", "loaded configuration from {path}");
        Ok(config)
    }

    /// Load `bundlekit.toml` from `directory` when present, otherwise the
    /// defaults.
    ///
    /// # Errors
    ///
    /// As for [`SharedConfig::load_from`] when the file exists.
    pub fn discover(directory: &Utf8Path) -> Result<Self, ConfigError> {
        let candidate = directory.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load_from(&candidate)
        } else {
            debug!(
                target: "bundlekit::config",
                "no {CONFIG_FILE_NAME} in {directory}; using defaults",
            );
            Ok(Self::default())
        }
    }

    /// Configured locale with blank values treated as absent.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        normalise_locale(self.locale.as_deref())
    }

    /// Validate the settings and build a [`ResolverConfig`].
    ///
    /// Format names are validated later, when the resolver is constructed,
    /// so unknown names are reported alongside the recognised ones.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a bad cache lifetime or an
    /// unparseable override locale.
    pub fn resolver_config(&self) -> Result<ResolverConfig, ConfigError> {
        let mut builder = ResolverConfig::builder();
        builder
            .formats(self.formats.iter().cloned())
            .cache_lifetime(self.cache_lifetime.to_lifetime()?);
        if let Some(encoding) = self
            .encoding
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
        {
            builder.encoding(encoding);
        }
        for entry in &self.locale_overrides {
            builder.locale_override(entry.to_entry()?);
        }
        Ok(builder.build())
    }

    /// Build a resolver over the configured roots, or the current directory
    /// when none are listed.
    ///
    /// # Errors
    ///
    /// As for [`SharedConfig::resolver_config`], plus
    /// [`ConfigError::Invalid`] when no configured format is recognised.
    pub fn directory_resolver(&self) -> Result<ResourceResolver<DirectoryProvider>, ConfigError> {
        let provider = if self.roots.is_empty() {
            DirectoryProvider::new([Utf8PathBuf::from(".")])
        } else {
            DirectoryProvider::new(self.roots.iter().cloned())
        };
        ResourceResolver::new(&self.resolver_config()?, provider).map_err(|source| {
            ConfigError::Invalid {
                field: "formats",
                source,
            }
        })
    }

    fn parse(source: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|source| ConfigError::Parse {
            origin: origin.to_owned(),
            source: Box::new(source),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_select_everything() {
        let config = SharedConfig::default();
        let resolver_config = config.resolver_config().expect("defaults are valid");

        assert!(config.locale().is_none());
        assert_eq!(resolver_config, ResolverConfig::default());
    }

    #[rstest]
    fn deserialises_every_setting() {
        let source = concat!(
            "encoding = \"Shift_JIS\"\n",
            "formats = [\"xml-properties\", \"text-properties\"]\n",
            "cache_lifetime = 1500\n",
            "locale = \"ja-JP\"\n",
            "roots = [\"/srv/strings\"]\n",
            "[[locale_overrides]]\n",
            "target = \"ja\"\n",
            "candidates = [\"en-US\", \"*\", \"root\"]\n",
        );

        let config = SharedConfig::from_toml_str(source).expect("valid configuration");
        let resolver_config = config.resolver_config().expect("valid settings");

        assert_eq!(config.locale(), Some("ja-JP"));
        assert_eq!(config.roots, [Utf8PathBuf::from("/srv/strings")]);
        assert_eq!(resolver_config.encoding(), Some("Shift_JIS"));
        assert_eq!(resolver_config.formats(), ["xml-properties", "text-properties"]);
        assert_eq!(resolver_config.cache_lifetime(), CacheLifetime::from_millis(1_500));

        let entry = resolver_config
            .locale_overrides()
            .first()
            .expect("one override");
        assert_eq!(entry.target(), &Locale::parse("ja").expect("valid"));
        assert_eq!(
            entry.candidates(),
            [
                CandidateLocale::Fixed(Locale::parse("en-US").expect("valid")),
                CandidateLocale::Requested,
                CandidateLocale::Fixed(Locale::root()),
            ]
        );
    }

    #[rstest]
    #[case("cache_lifetime = \"never-cache\"\n", CacheLifetime::NeverCache)]
    #[case("cache_lifetime = \"never-expire\"\n", CacheLifetime::NeverExpire)]
    #[case("cache_lifetime = 0\n", CacheLifetime::from_millis(0))]
    fn reads_cache_lifetimes(#[case] source: &str, #[case] expected: CacheLifetime) {
        let config = SharedConfig::from_toml_str(source).expect("valid configuration");
        let lifetime = config.cache_lifetime.to_lifetime().expect("valid lifetime");
        assert_eq!(lifetime, expected);
    }

    #[rstest]
    #[case::named("cache_lifetime = \"sometimes\"\n")]
    #[case::override_locale("[[locale_overrides]]\ntarget = \"??\"\ncandidates = []\n")]
    fn rejects_invalid_values(#[case] source: &str) {
        let config = SharedConfig::from_toml_str(source).expect("valid TOML");
        assert!(matches!(
            config.resolver_config(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[rstest]
    #[case::unknown_field("unexpected = true\n")]
    #[case::negative_lifetime("cache_lifetime = -1\n")]
    #[case::wrong_type("formats = \"xml-properties\"\n")]
    #[case::unknown_override_field("[[locale_overrides]]\ntarget = \"ja\"\nfallback = true\n")]
    fn rejects_malformed_files(#[case] source: &str) {
        assert!(matches!(
            SharedConfig::from_toml_str(source),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[rstest]
    fn blank_locale_and_encoding_are_ignored() {
        let config = SharedConfig::from_toml_str("locale = \"  \"\nencoding = \"\"\n")
            .expect("valid configuration");

        assert!(config.locale().is_none());
        assert_eq!(config.resolver_config().expect("valid").encoding(), None);
    }

    #[rstest]
    #[case::padded("encoding = \" UTF-8 \"\n", Some("UTF-8"))]
    #[case::whitespace("encoding = \" \t \"\n", None)]
    #[case::absent("", None)]
    fn encoding_labels_are_trimmed(#[case] source: &str, #[case] expected: Option<&str>) {
        let config = SharedConfig::from_toml_str(source).expect("valid configuration");

        assert_eq!(config.resolver_config().expect("valid").encoding(), expected);
    }

    #[rstest]
    fn directory_resolver_rejects_unknown_formats() {
        let config = SharedConfig::from_toml_str("formats = [\"yaml\"]\n").expect("valid TOML");

        assert!(matches!(
            config.directory_resolver(),
            Err(ConfigError::Invalid { field: "formats", .. })
        ));
    }

    #[rstest]
    fn directory_resolver_defaults_to_the_current_directory() {
        let resolver = SharedConfig::default()
            .directory_resolver()
            .expect("defaults are valid");

        assert_eq!(resolver.provider().roots(), [Utf8PathBuf::from(".")]);
    }

    #[rstest]
    fn load_with_reports_read_failures() {
        let outcome = SharedConfig::load_with(Utf8Path::new("missing/bundlekit.toml"), |_| {
            Err(io::Error::new(io::ErrorKind::NotFound, "absent"))
        });

        assert!(matches!(
            outcome,
            Err(ConfigError::Read { ref path, .. }) if path == "missing/bundlekit.toml"
        ));
    }

    #[rstest]
    fn load_with_keeps_absolute_roots() {
        let config = SharedConfig::load_with(Utf8Path::new("conf/bundlekit.toml"), |_| {
            Ok(String::from("roots = [\"/abs\", \"rel\"]\n"))
        })
        .expect("valid configuration");

        assert_eq!(
            config.roots,
            [Utf8PathBuf::from("/abs"), Utf8PathBuf::from("conf/rel")]
        );
    }
}
