//! Default candidate-locale expansion.

use std::fmt;

use crate::locale::Locale;

/// Produces the candidate chain for a locale that has no registered
/// override.
pub trait DefaultLocaleExpansion: fmt::Debug + Send + Sync {
    /// Candidate locales for `locale`, most specific first.
    fn expand(&self, locale: &Locale) -> Vec<Locale>;
}

/// The standard most-specific-first expansion.
///
/// Variants are removed one at a time, then the region, then the language;
/// a locale with a script first walks the chain with the script kept and then
/// the chain without it. [`Locale::root`] always closes the list.
///
/// ```
/// use bundlekit_common::{DefaultLocaleExpansion, Locale, StandardExpansion};
///
/// let chain = StandardExpansion.expand(&"ja-JP".parse().expect("valid"));
/// let tags: Vec<String> = chain.iter().map(ToString::to_string).collect();
/// assert_eq!(tags, ["ja-JP", "ja", "root"]);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardExpansion;

impl DefaultLocaleExpansion for StandardExpansion {
    fn expand(&self, locale: &Locale) -> Vec<Locale> {
        let mut chain = Vec::new();

        if locale.script().is_some() {
            push_chain(&mut chain, locale, true);
        }
        push_chain(&mut chain, locale, false);
        chain.push(Locale::root());

        let mut unique: Vec<Locale> = Vec::with_capacity(chain.len());
        for candidate in chain {
            if !unique.contains(&candidate) {
                unique.push(candidate);
            }
        }
        unique
    }
}

fn push_chain(chain: &mut Vec<Locale>, locale: &Locale, keep_script: bool) {
    for count in (1..=locale.variant_count()).rev() {
        chain.push(locale.truncated(keep_script, true, count));
    }
    if locale.region().is_some() {
        chain.push(locale.truncated(keep_script, true, 0));
    }
    if keep_script || !locale.language().is_empty() {
        chain.push(locale.truncated(keep_script, false, 0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tags(locale: &str) -> Vec<String> {
        let locale = Locale::parse(locale).expect("valid locale");
        StandardExpansion
            .expand(&locale)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[rstest]
    #[case("root", &["root"])]
    #[case("ja", &["ja", "root"])]
    #[case("ja-JP", &["ja-JP", "ja", "root"])]
    #[case("zh-Hant-TW", &["zh-Hant-TW", "zh-Hant", "zh-TW", "zh", "root"])]
    #[case(
        "de-DE-1996-fonipa",
        &["de-DE-1996-fonipa", "de-DE-1996", "de-DE", "de", "root"]
    )]
    fn expands_most_specific_first(#[case] locale: &str, #[case] expected: &[&str]) {
        assert_eq!(tags(locale), expected);
    }
}
