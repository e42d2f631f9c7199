//! Bundles built into the program.
//!
//! The `compiled` format looks a bundle up by its bundle name (for example
//! `message_ja_JP`) instead of reading a file, so programs can ship default
//! strings without any resource directory.

use std::collections::HashMap;

use crate::decode::Entries;

/// Registry of in-process bundles keyed by bundle name.
///
/// ```
/// use bundlekit_common::CompiledBundles;
///
/// let bundles = CompiledBundles::new()
///     .with_bundle("message", [("hello", "Hello")])
///     .with_bundle("message_ja", [("hello", "こんにちは")]);
/// assert_eq!(
///     bundles.get("message_ja").and_then(|entries| entries.get("hello")).map(String::as_str),
///     Some("こんにちは"),
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledBundles {
    bundles: HashMap<String, Entries>,
}

impl CompiledBundles {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`CompiledBundles::register`].
    #[must_use]
    pub fn with_bundle<I, K, V>(mut self, bundle_name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.register(bundle_name, entries);
        self
    }

    /// Register `entries` under `bundle_name`, replacing any previous bundle.
    pub fn register<I, K, V>(&mut self, bundle_name: impl Into<String>, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.bundles.insert(bundle_name.into(), entries);
    }

    /// Entries of `bundle_name`, if registered.
    #[must_use]
    pub fn get(&self, bundle_name: &str) -> Option<&Entries> {
        self.bundles.get(bundle_name)
    }

    /// Number of registered bundles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Whether no bundle is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}
