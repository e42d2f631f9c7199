//! Output formatting for resolved bundles and candidate lists.
//!
//! Every formatter has a human-readable and a JSON rendering.

use bundlekit_common::{Entries, LocaleSelection, ResolvedResource};
use serde::Serialize;

/// Format a resolved bundle for reading.
///
/// # Examples
///
/// ```
/// use bundlekit_cli::output::format_resource_human;
/// use bundlekit_common::testing::MemoryProvider;
/// use bundlekit_common::{Locale, ResolverConfig, ResourceResolver, select_locale};
///
/// let provider = MemoryProvider::new().with_resource("app.properties", "greeting=hi");
/// let resolver = ResourceResolver::new(&ResolverConfig::default(), provider)?;
/// let resource = resolver.resolve("app", &Locale::root())?;
/// let selection = select_locale(None, None, None, None);
///
/// let output = format_resource_human("app", &selection, &resource);
/// assert!(output.contains("greeting = hi"));
/// # Ok::<(), bundlekit_common::ResolveError>(())
/// ```
#[must_use]
pub fn format_resource_human(
    base_name: &str,
    selection: &LocaleSelection,
    resource: &ResolvedResource,
) -> String {
    let mut output = format!(
        "Bundle: {base_name}\nRequested: {} ({})\nResolved: {} [{}] from {}\n",
        selection.locale(),
        selection.source(),
        resource.locale(),
        resource.format().name(),
        resource.path(),
    );

    if resource.entries().is_empty() {
        output.push_str("\n(no entries)");
        return output;
    }

    output.push('\n');
    for (key, value) in resource.entries() {
        output.push_str(&format!("{key} = {value}\n"));
    }
    output
}

/// Format a resolved bundle as JSON.
#[must_use]
pub fn format_resource_json(
    base_name: &str,
    selection: &LocaleSelection,
    resource: &ResolvedResource,
) -> String {
    let json = ResolvedJson {
        base_name,
        requested_locale: selection.locale().to_string(),
        locale_source: selection.source().to_string(),
        locale: resource.locale().to_string(),
        format: resource.format().name(),
        path: resource.path(),
        entries: resource.entries(),
    };
    serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_owned())
}

/// Format the lookup order for `selection` for reading.
#[must_use]
pub fn format_candidates_human(selection: &LocaleSelection, candidates: &[String]) -> String {
    let mut output = format!(
        "Candidates for {} ({}):\n",
        selection.locale(),
        selection.source()
    );
    for (position, candidate) in candidates.iter().enumerate() {
        output.push_str(&format!("  {}. {candidate}\n", position + 1));
    }
    output
}

/// Format the lookup order for `selection` as JSON.
///
/// # Examples
///
/// ```
/// use bundlekit_cli::output::format_candidates_json;
/// use bundlekit_common::select_locale;
///
/// let selection = select_locale(Some("fr"), None, None, None);
/// let json = format_candidates_json(&selection, &["fr".to_owned(), "root".to_owned()]);
/// assert!(json.contains("\"candidates\""));
/// ```
#[must_use]
pub fn format_candidates_json(selection: &LocaleSelection, candidates: &[String]) -> String {
    let json = CandidatesJson {
        locale: selection.locale().to_string(),
        locale_source: selection.source().to_string(),
        candidates,
    };
    serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_owned())
}

/// JSON-serializable view of a resolved bundle.
#[derive(Debug, Serialize)]
pub struct ResolvedJson<'a> {
    /// Bundle name that was requested.
    pub base_name: &'a str,
    /// Locale the caller asked for.
    pub requested_locale: String,
    /// Where the requested locale came from.
    pub locale_source: String,
    /// Locale of the bundle that was found.
    pub locale: String,
    /// Format of the bundle that was found.
    pub format: &'static str,
    /// Resource path that was loaded.
    pub path: &'a str,
    /// Decoded entries, sorted by key.
    pub entries: &'a Entries,
}

/// JSON-serializable view of a candidate list.
#[derive(Debug, Serialize)]
pub struct CandidatesJson<'a> {
    /// Locale the candidates were computed for.
    pub locale: String,
    /// Where that locale came from.
    pub locale_source: String,
    /// Candidate locales in lookup order.
    pub candidates: &'a [String],
}
