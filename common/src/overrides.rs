//! Per-locale overrides of the candidate chain.
//!
//! An override pins the exact list of locales tried when a particular target
//! locale is requested. Lists may contain [`CandidateLocale::Requested`],
//! which stands for the requested locale itself and is substituted on every
//! lookup. Locales without an override use the table's
//! [`DefaultLocaleExpansion`].

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};

use crate::expansion::{DefaultLocaleExpansion, StandardExpansion};
use crate::locale::{CandidateLocale, Locale};

/// A target locale and the candidates to try for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleOverrideEntry {
    target: Locale,
    candidates: Vec<CandidateLocale>,
}

impl LocaleOverrideEntry {
    /// Create an entry for `target` with `candidates` in lookup order.
    #[must_use]
    pub fn new<I, C>(target: Locale, candidates: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CandidateLocale>,
    {
        Self {
            target,
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a candidate to the end of the list.
    #[must_use]
    pub fn with_candidate(mut self, candidate: impl Into<CandidateLocale>) -> Self {
        self.candidates.push(candidate.into());
        self
    }

    /// Append the requested-locale placeholder to the end of the list.
    #[must_use]
    pub fn with_requested(self) -> Self {
        self.with_candidate(CandidateLocale::Requested)
    }

    /// The locale this entry applies to.
    #[must_use]
    pub const fn target(&self) -> &Locale {
        &self.target
    }

    /// The candidates in lookup order, placeholders unresolved.
    #[must_use]
    pub fn candidates(&self) -> &[CandidateLocale] {
        &self.candidates
    }
}

/// Lookup table from target locale to candidate chain.
///
/// Registering two entries for the same target keeps the later one.
#[derive(Clone, Debug)]
pub struct LocaleOverrideTable {
    entries: HashMap<Locale, Vec<CandidateLocale>>,
    expansion: Arc<dyn DefaultLocaleExpansion>,
}

impl LocaleOverrideTable {
    /// Build a table using [`StandardExpansion`] for locales without an
    /// override.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = LocaleOverrideEntry>) -> Self {
        Self::with_expansion(entries, Arc::new(StandardExpansion))
    }

    /// Build a table with a custom default expansion.
    #[must_use]
    pub fn with_expansion(
        entries: impl IntoIterator<Item = LocaleOverrideEntry>,
        expansion: Arc<dyn DefaultLocaleExpansion>,
    ) -> Self {
        let mut table = HashMap::new();
        for entry in entries {
            if table.insert(entry.target.clone(), entry.candidates).is_some() {
                warn!(
                    target: "bundle::overrides",
                    "replacing earlier candidate override for `{}`",
                    entry.target,
                );
            }
        }

        Self {
            entries: table,
            expansion,
        }
    }

    /// Replace the default expansion.
    #[must_use]
    pub fn expansion(mut self, expansion: Arc<dyn DefaultLocaleExpansion>) -> Self {
        self.expansion = expansion;
        self
    }

    /// Whether an override is registered for `target`.
    #[must_use]
    pub fn is_overridden(&self, target: &Locale) -> bool {
        self.entries.contains_key(target)
    }

    /// Candidate locales for `target`, most preferred first.
    ///
    /// A registered override is returned element for element with each
    /// placeholder replaced by `target`. An override with no candidates
    /// yields an empty list. Unregistered targets use the default expansion.
    ///
    /// ```
    /// use bundlekit_common::{Locale, LocaleOverrideEntry, LocaleOverrideTable};
    ///
    /// let japanese: Locale = "ja".parse().expect("valid");
    /// let us: Locale = "en-US".parse().expect("valid");
    /// let table = LocaleOverrideTable::new([LocaleOverrideEntry::new(
    ///     japanese.clone(),
    ///     [Some(us.clone()), None, Some(Locale::root())],
    /// )]);
    ///
    /// assert_eq!(
    ///     table.candidates_for(&japanese),
    ///     vec![us, japanese.clone(), Locale::root()]
    /// );
    /// ```
    #[must_use]
    pub fn candidates_for(&self, target: &Locale) -> Vec<Locale> {
        match self.entries.get(target) {
            Some(candidates) => {
                debug!(
                    target: "bundle::overrides",
                    "using registered candidates for `{target}`",
                );
                candidates
                    .iter()
                    .map(|candidate| candidate.resolve(target))
                    .collect()
            }
            None => self.expansion.expand(target),
        }
    }
}

impl Default for LocaleOverrideTable {
    fn default() -> Self {
        Self::new([])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn locale(tag: &str) -> Locale {
        Locale::parse(tag).expect("valid locale")
    }

    #[derive(Debug)]
    struct FixedExpansion(Vec<Locale>);

    impl DefaultLocaleExpansion for FixedExpansion {
        fn expand(&self, _locale: &Locale) -> Vec<Locale> {
            self.0.clone()
        }
    }

    #[fixture]
    fn table() -> LocaleOverrideTable {
        LocaleOverrideTable::new([
            LocaleOverrideEntry::new(locale("ja"), [locale("en-US"), locale("ja-JP"), Locale::root()]),
            LocaleOverrideEntry::new(locale("ja-JP"), [Some(locale("fr-FR")), None]),
            LocaleOverrideEntry::new(locale("ko"), Vec::<CandidateLocale>::new()),
        ])
    }

    #[rstest]
    fn returns_registered_candidates_verbatim(table: LocaleOverrideTable) {
        assert_eq!(
            table.candidates_for(&locale("ja")),
            vec![locale("en-US"), locale("ja-JP"), Locale::root()]
        );
    }

    #[rstest]
    fn substitutes_placeholder_with_target(table: LocaleOverrideTable) {
        assert_eq!(
            table.candidates_for(&locale("ja-JP")),
            vec![locale("fr-FR"), locale("ja-JP")]
        );
    }

    #[rstest]
    fn empty_override_yields_no_candidates(table: LocaleOverrideTable) {
        assert!(table.candidates_for(&locale("ko")).is_empty());
        assert!(table.is_overridden(&locale("ko")));
    }

    #[rstest]
    #[case("en-US")]
    #[case("zh-CN")]
    #[case("root")]
    fn unregistered_targets_use_default_expansion(table: LocaleOverrideTable, #[case] tag: &str) {
        let target = locale(tag);
        assert_eq!(table.candidates_for(&target), StandardExpansion.expand(&target));
    }

    #[test]
    fn custom_expansion_replaces_standard_chain() {
        let table = LocaleOverrideTable::default()
            .expansion(Arc::new(FixedExpansion(vec![locale("eo"), Locale::root()])));
        assert_eq!(
            table.candidates_for(&locale("de")),
            vec![locale("eo"), Locale::root()]
        );
    }

    #[test]
    fn later_registration_wins() {
        let table = LocaleOverrideTable::new([
            LocaleOverrideEntry::new(locale("ja"), [locale("en")]),
            LocaleOverrideEntry::new(locale("ja"), [locale("fr")]),
        ]);
        assert_eq!(table.candidates_for(&locale("ja")), vec![locale("fr")]);
    }

    #[test]
    fn builder_appends_in_call_order() {
        let entry = LocaleOverrideEntry::new(locale("ja"), Vec::<CandidateLocale>::new())
            .with_candidate(locale("en-US"))
            .with_requested()
            .with_candidate(Locale::root());
        assert_eq!(
            entry.candidates(),
            &[
                CandidateLocale::Fixed(locale("en-US")),
                CandidateLocale::Requested,
                CandidateLocale::Fixed(Locale::root()),
            ]
        );
    }
}
