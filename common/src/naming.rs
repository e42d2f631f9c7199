//! Bundle and resource naming.
//!
//! A bundle name is the base name followed by the locale's subtags joined
//! with `_`, for example `message_ja_JP`. The resource name turns the dotted
//! bundle name into a `/`-separated path and appends the format's extension:
//!
//! ```text
//! app.strings + ja-JP  ->  app.strings_ja_JP  ->  app/strings_ja_JP.properties
//! ```

use crate::locale::Locale;

/// Bundle name for `base_name` in `locale`.
///
/// [`Locale::root`] maps to the base name itself.
///
/// ```
/// use bundlekit_common::Locale;
/// use bundlekit_common::naming::bundle_name;
///
/// let locale: Locale = "ja-JP".parse().expect("valid");
/// assert_eq!(bundle_name("message", &locale), "message_ja_JP");
/// assert_eq!(bundle_name("message", &Locale::root()), "message");
/// ```
#[must_use]
pub fn bundle_name(base_name: &str, locale: &Locale) -> String {
    if locale.is_root() {
        return base_name.to_owned();
    }

    let language = locale.language();
    let script = locale.script().unwrap_or_default();
    let region = locale.region().unwrap_or_default();
    let variant = locale.variants().collect::<Vec<_>>().join("_");

    let mut name = String::from(base_name);
    name.push('_');
    name.push_str(language);

    if !script.is_empty() {
        name.push('_');
        name.push_str(script);
    }
    if !variant.is_empty() {
        name.push('_');
        name.push_str(region);
        name.push('_');
        name.push_str(&variant);
    } else if !region.is_empty() {
        name.push('_');
        name.push_str(region);
    }

    name
}

/// Resource path for `bundle_name` with `extension`.
///
/// Returns `None` for bundle names that look like URLs; those cannot be
/// mapped onto a provider path.
///
/// ```
/// use bundlekit_common::naming::resource_name;
///
/// assert_eq!(
///     resource_name("app.strings_ja", "properties").as_deref(),
///     Some("app/strings_ja.properties")
/// );
/// assert_eq!(resource_name("http://host/strings", "xml"), None);
/// ```
#[must_use]
pub fn resource_name(bundle_name: &str, extension: &str) -> Option<String> {
    if bundle_name.contains("://") {
        return None;
    }
    Some(format!("{}.{extension}", bundle_name.replace('.', "/")))
}
