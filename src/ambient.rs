//! Ambient locale lookup.

use std::env;

use bundlekit_common::{LOCALE_ENV_VAR, LocaleSelection, select_locale};

use crate::config::SharedConfig;

/// Select the locale for a caller that may not have named one.
///
/// Consults, in order, `explicit`, the `BUNDLEKIT_LOCALE` environment
/// variable, the configured locale, and the operating-system locale, falling
/// back to the root locale.
#[must_use]
pub fn ambient_locale(explicit: Option<&str>, config: &SharedConfig) -> LocaleSelection {
    let selection = select_locale(
        explicit,
        env::var(LOCALE_ENV_VAR).ok(),
        config.locale(),
        sys_locale::get_locale(),
    );
    selection.log_outcome("bundlekit::locale");
    selection
}
