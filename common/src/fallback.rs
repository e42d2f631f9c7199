//! Single retry against the root locale.
//!
//! When every candidate for a request is exhausted the resolver retries once
//! with [`Locale::root`]. The attempt state travels with each call, so one
//! resolver can serve concurrent requests without sharing the retry flag.

use log::debug;

use crate::error::{ResolveError, Result};
use crate::locale::Locale;

/// State of one top-level resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionAttempt<'a> {
    base_name: &'a str,
    requested: &'a Locale,
    fallback_attempted: bool,
}

impl<'a> ResolutionAttempt<'a> {
    /// Start an attempt for `base_name` in `requested`.
    #[must_use]
    pub const fn new(base_name: &'a str, requested: &'a Locale) -> Self {
        Self {
            base_name,
            requested,
            fallback_attempted: false,
        }
    }

    /// Base name being resolved.
    #[must_use]
    pub const fn base_name(&self) -> &'a str {
        self.base_name
    }

    /// Locale the caller originally asked for.
    #[must_use]
    pub const fn requested(&self) -> &'a Locale {
        self.requested
    }

    /// Whether the root fallback has already been taken.
    #[must_use]
    pub const fn fallback_attempted(&self) -> bool {
        self.fallback_attempted
    }

    fn not_found(&self) -> ResolveError {
        ResolveError::ResourceNotFound {
            base_name: self.base_name.to_owned(),
            locale: self.requested.clone(),
        }
    }
}

/// Chooses the locale to retry with once the candidate chain is exhausted.
#[derive(Clone, Copy, Debug, Default)]
pub struct FallbackPolicy;

impl FallbackPolicy {
    /// Return [`Locale::root`] the first time it is asked within `attempt`.
    ///
    /// # Errors
    ///
    /// A second call within the same attempt means the root locale has no
    /// resource either; it fails with [`ResolveError::ResourceNotFound`]
    /// naming the base name and the originally requested locale.
    ///
    /// ```
    /// use bundlekit_common::{FallbackPolicy, Locale, ResolutionAttempt};
    ///
    /// let requested: Locale = "zh".parse().expect("valid");
    /// let mut attempt = ResolutionAttempt::new("message", &requested);
    ///
    /// let retry = FallbackPolicy.fallback_locale("message", &mut attempt);
    /// assert_eq!(retry.expect("first fallback"), Locale::root());
    /// assert!(FallbackPolicy.fallback_locale("message", &mut attempt).is_err());
    /// ```
    pub fn fallback_locale(
        &self,
        base_name: &str,
        attempt: &mut ResolutionAttempt<'_>,
    ) -> Result<Locale> {
        if attempt.fallback_attempted {
            debug!(
                target: "bundle::fallback",
                "root fallback already taken for `{base_name}`; giving up",
            );
            return Err(attempt.not_found());
        }

        attempt.fallback_attempted = true;
        debug!(
            target: "bundle::fallback",
            "no candidate matched `{base_name}` for `{}`; retrying with root",
            attempt.requested,
        );
        Ok(Locale::root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_fallback_selects_root_and_marks_attempt() {
        let requested = Locale::parse("zh").expect("valid");
        let mut attempt = ResolutionAttempt::new("message", &requested);

        let retry = FallbackPolicy.fallback_locale("message", &mut attempt);

        assert_eq!(retry.expect("first fallback succeeds"), Locale::root());
        assert!(attempt.fallback_attempted());
    }

    #[test]
    fn second_fallback_reports_original_request() {
        let requested = Locale::parse("zh-CN").expect("valid");
        let mut attempt = ResolutionAttempt::new("message", &requested);
        FallbackPolicy
            .fallback_locale("message", &mut attempt)
            .expect("first fallback succeeds");

        let error = FallbackPolicy
            .fallback_locale("message", &mut attempt)
            .expect_err("second fallback fails");

        match error {
            ResolveError::ResourceNotFound { base_name, locale } => {
                assert_eq!(base_name, "message");
                assert_eq!(locale, requested);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn attempts_do_not_share_state() {
        let requested = Locale::parse("fr").expect("valid");
        let mut first = ResolutionAttempt::new("message", &requested);
        let mut second = ResolutionAttempt::new("message", &requested);

        assert!(FallbackPolicy.fallback_locale("message", &mut first).is_ok());
        assert!(FallbackPolicy.fallback_locale("message", &mut second).is_ok());
    }
}
