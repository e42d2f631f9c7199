//! Behaviour-driven coverage for resource resolution.
//!
//! Scenarios exercise the candidate walk, format priority, overrides, and the
//! single root fallback against an in-memory provider.

use std::cell::RefCell;

use bundlekit_common::testing::MemoryProvider;
use bundlekit_common::{
    CandidateLocale, Locale, LocaleOverrideEntry, ResolveError, ResolvedResource, ResolverConfig,
    ResourceResolver,
};
use logtest::Logger;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|stripped| stripped.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_locale(tag: &str) -> Locale {
    Locale::parse(tag).unwrap_or_else(|error| panic!("invalid locale `{tag}`: {error}"))
}

#[derive(Default)]
struct ResolutionWorld {
    provider: MemoryProvider,
    formats: RefCell<Vec<String>>,
    overrides: RefCell<Vec<LocaleOverrideEntry>>,
    outcome: RefCell<Option<Result<ResolvedResource, ResolveError>>>,
}

impl ResolutionWorld {
    fn config(&self) -> ResolverConfig {
        let mut builder = ResolverConfig::builder();
        builder.formats(self.formats.borrow().iter().cloned());
        for entry in self.overrides.borrow().iter() {
            builder.locale_override(entry.clone());
        }
        builder.build()
    }

    fn resolve(&self, base_name: &str, locale: &Locale) {
        let outcome = ResourceResolver::new(&self.config(), &self.provider)
            .and_then(|resolver| resolver.resolve(base_name, locale));
        self.outcome.borrow_mut().replace(outcome);
    }

    fn resolved(&self) -> ResolvedResource {
        match self.outcome.borrow().as_ref() {
            Some(Ok(resource)) => resource.clone(),
            Some(Err(error)) => panic!("resolution failed: {error}"),
            None => panic!("nothing was resolved"),
        }
    }

    fn error(&self) -> String {
        match self.outcome.borrow().as_ref() {
            Some(Err(error)) => format!("{error:?}"),
            Some(Ok(resource)) => panic!("expected a failure, resolved {}", resource.path()),
            None => panic!("nothing was resolved"),
        }
    }
}

#[fixture]
fn world() -> ResolutionWorld {
    ResolutionWorld::default()
}

#[given("a resource {path} containing {contents}")]
fn given_resource(world: &ResolutionWorld, path: String, contents: String) {
    world.provider.insert(unquote(&path), unquote(&contents));
}

#[given("an XML resource {path} with {key} set to {value}")]
fn given_xml_resource(world: &ResolutionWorld, path: String, key: String, value: String) {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><properties><entry key="{}">{}</entry></properties>"#,
        unquote(&key),
        unquote(&value),
    );
    world.provider.insert(unquote(&path), document);
}

#[given("no resources are available")]
fn given_no_resources(world: &ResolutionWorld) {
    assert!(world.provider.requests().is_empty());
}

#[given("the formats {formats} are requested")]
fn given_formats(world: &ResolutionWorld, formats: String) {
    world
        .formats
        .borrow_mut()
        .extend(unquote(&formats).split(',').map(|name| name.trim().to_owned()));
}

#[given("locale {target} is overridden with candidates {candidates}")]
fn given_override(world: &ResolutionWorld, target: String, candidates: String) {
    let candidates = unquote(&candidates)
        .split(',')
        .map(|tag| {
            CandidateLocale::parse(tag.trim())
                .unwrap_or_else(|error| panic!("invalid candidate `{tag}`: {error}"))
        })
        .collect::<Vec<_>>();
    world
        .overrides
        .borrow_mut()
        .push(LocaleOverrideEntry::new(parse_locale(unquote(&target)), candidates));
}

#[when("I resolve {base_name} for locale {locale}")]
fn when_resolve(world: &ResolutionWorld, base_name: String, locale: String) {
    world.resolve(unquote(&base_name), &parse_locale(unquote(&locale)));
}

#[then("the resolved locale is {locale}")]
fn then_locale(world: &ResolutionWorld, locale: String) {
    assert_eq!(world.resolved().locale(), &parse_locale(unquote(&locale)));
}

#[then("the resolved format is {format}")]
fn then_format(world: &ResolutionWorld, format: String) {
    assert_eq!(world.resolved().format().name(), unquote(&format));
}

#[then("the value of {key} is {value}")]
fn then_value(world: &ResolutionWorld, key: String, value: String) {
    assert_eq!(world.resolved().get(unquote(&key)), Some(unquote(&value)));
}

#[then("resolution fails because the resource is missing for {locale}")]
fn then_not_found(world: &ResolutionWorld, locale: String) {
    let expected = parse_locale(unquote(&locale));
    match world.outcome.borrow().as_ref() {
        Some(Err(ResolveError::ResourceNotFound { locale, .. })) => assert_eq!(locale, &expected),
        _ => panic!("expected ResourceNotFound, got {}", world.error()),
    }
}

#[then("resolution fails because no format is recognised")]
fn then_invalid_format(world: &ResolutionWorld) {
    assert!(world.error().contains("InvalidFormat"));
}

#[scenario(path = "tests/features/resolution.feature", index = 0)]
fn scenario_root_fallback(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/resolution.feature", index = 1)]
fn scenario_not_found(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/resolution.feature", index = 2)]
fn scenario_default_format_priority(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/resolution.feature", index = 3)]
fn scenario_requested_xml(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/resolution.feature", index = 4)]
fn scenario_override(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/resolution.feature", index = 5)]
fn scenario_invalid_formats(world: ResolutionWorld) {
    let _ = world;
}

#[test]
fn unknown_formats_are_logged_when_dropped() {
    let mut logger = Logger::start();
    let world = ResolutionWorld::default();
    world.provider.insert("message.properties", "k=v");
    world
        .formats
        .borrow_mut()
        .extend(["yaml".to_owned(), "text-properties".to_owned()]);

    world.resolve("message", &Locale::root());
    assert_eq!(world.resolved().get("k"), Some("v"));

    let mut warned = false;
    while let Some(record) = logger.pop() {
        if record.args().to_string().contains("yaml") {
            warned = true;
            break;
        }
    }

    assert!(warned, "expected the dropped format to be logged");
}
