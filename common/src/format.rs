//! Resource formats and their priority order.

use std::fmt;

use log::warn;

use crate::error::{ResolveError, Result};

/// A backing format a bundle can be loaded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceFormat {
    /// Bundles built into the binary and registered with
    /// [`crate::CompiledBundles`].
    Compiled,
    /// `key=value` property files.
    TextProperties,
    /// XML property documents.
    XmlProperties,
}

impl ResourceFormat {
    /// Every format in default priority order.
    pub const ALL: [Self; 3] = [Self::Compiled, Self::TextProperties, Self::XmlProperties];

    /// Look a format up by its configuration name.
    ///
    /// ```
    /// use bundlekit_common::ResourceFormat;
    ///
    /// assert_eq!(
    ///     ResourceFormat::from_name("xml-properties"),
    ///     Some(ResourceFormat::XmlProperties)
    /// );
    /// assert_eq!(ResourceFormat::from_name("yaml"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.name() == name.trim())
    }

    /// Configuration name of the format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Compiled => "compiled",
            Self::TextProperties => "text-properties",
            Self::XmlProperties => "xml-properties",
        }
    }

    /// File extension used for file-backed formats.
    #[must_use]
    pub const fn extension(self) -> Option<&'static str> {
        match self {
            Self::Compiled => None,
            Self::TextProperties => Some("properties"),
            Self::XmlProperties => Some("xml"),
        }
    }
}

impl fmt::Display for ResourceFormat {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Ordered, duplicate-free, non-empty list of formats to try.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatPreference {
    formats: Vec<ResourceFormat>,
}

impl FormatPreference {
    /// Formats in lookup order.
    #[must_use]
    pub fn as_slice(&self) -> &[ResourceFormat] {
        &self.formats
    }

    /// Iterate over the formats in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = ResourceFormat> + '_ {
        self.formats.iter().copied()
    }

    /// Whether `format` will be tried.
    #[must_use]
    pub fn contains(&self, format: ResourceFormat) -> bool {
        self.formats.contains(&format)
    }
}

impl Default for FormatPreference {
    fn default() -> Self {
        Self {
            formats: ResourceFormat::ALL.to_vec(),
        }
    }
}

/// Validation of caller-supplied format names.
#[derive(Clone, Copy, Debug, Default)]
pub struct FormatSet;

impl FormatSet {
    /// Validate `requested` and return the formats to try.
    ///
    /// An empty request selects every format in default priority
    /// (compiled, text-properties, xml-properties). Otherwise the recognised
    /// names are kept in the caller's order with duplicates removed, and
    /// unrecognised names are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidFormat`] when no requested name is
    /// recognised.
    ///
    /// # Examples
    ///
    /// ```
    /// use bundlekit_common::{FormatSet, ResourceFormat};
    ///
    /// let formats = FormatSet::ordered_formats(&["xml-properties", "text-properties"])
    ///     .expect("known formats");
    /// assert_eq!(
    ///     formats.as_slice(),
    ///     &[ResourceFormat::XmlProperties, ResourceFormat::TextProperties]
    /// );
    /// assert!(FormatSet::ordered_formats(&["yaml"]).is_err());
    /// ```
    pub fn ordered_formats<S: AsRef<str>>(requested: &[S]) -> Result<FormatPreference> {
        if requested.is_empty() {
            return Ok(FormatPreference::default());
        }

        let mut formats = Vec::with_capacity(ResourceFormat::ALL.len());
        for name in requested.iter().map(AsRef::as_ref) {
            match ResourceFormat::from_name(name) {
                Some(format) if !formats.contains(&format) => formats.push(format),
                Some(_) => {}
                None => warn!(
                    target: "bundle::format",
                    "ignoring unknown resource format `{name}`",
                ),
            }
        }

        if formats.is_empty() {
            return Err(ResolveError::InvalidFormat {
                requested: requested.iter().map(|name| name.as_ref().to_owned()).collect(),
            });
        }

        Ok(FormatPreference { formats })
    }
}
