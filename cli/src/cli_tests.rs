//! Tests for CLI parsing.

use super::*;
use clap::CommandFactory;
use rstest::rstest;

#[test]
fn resolve_parses_defaults() {
    let cli = Cli::parse_from(["bundlekit", "resolve", "app.messages"]);
    let Command::Resolve(args) = cli.command else {
        panic!("expected the resolve subcommand");
    };

    assert_eq!(args.base_name, "app.messages");
    assert!(args.root.is_empty());
    assert!(args.format.is_empty());
    assert!(args.encoding.is_none());
    assert!(args.common.config.is_none());
    assert!(args.common.locale.is_none());
    assert!(!args.common.json);
}

#[test]
fn resolve_collects_repeated_options_in_order() {
    let cli = Cli::parse_from([
        "bundlekit",
        "resolve",
        "app.messages",
        "-r",
        "first",
        "--root",
        "second",
        "-f",
        "xml-properties",
        "--format",
        "text-properties",
        "--encoding",
        "UTF-8",
        "--locale",
        "ja-JP",
        "--json",
    ]);
    let Command::Resolve(args) = cli.command else {
        panic!("expected the resolve subcommand");
    };

    assert_eq!(
        args.root,
        [Utf8PathBuf::from("first"), Utf8PathBuf::from("second")]
    );
    assert_eq!(args.format, ["xml-properties", "text-properties"]);
    assert_eq!(args.encoding.as_deref(), Some("UTF-8"));
    assert_eq!(args.common.locale.as_deref(), Some("ja-JP"));
    assert!(args.common.json);
}

#[rstest]
#[case::short(&["bundlekit", "candidates", "-l", "fr-CA"])]
#[case::long(&["bundlekit", "candidates", "--locale", "fr-CA"])]
fn candidates_accepts_a_locale(#[case] argv: &[&str]) {
    let cli = Cli::parse_from(argv);
    let Command::Candidates(args) = cli.command else {
        panic!("expected the candidates subcommand");
    };

    assert_eq!(args.common.locale.as_deref(), Some("fr-CA"));
}

#[test]
fn config_path_is_utf8() {
    let cli = Cli::parse_from(["bundlekit", "candidates", "-c", "conf/bundlekit.toml"]);
    let Command::Candidates(args) = cli.command else {
        panic!("expected the candidates subcommand");
    };

    assert_eq!(
        args.common.config,
        Some(Utf8PathBuf::from("conf/bundlekit.toml"))
    );
}

#[rstest]
#[case::missing_subcommand(&["bundlekit"])]
#[case::missing_base_name(&["bundlekit", "resolve"])]
#[case::positional_locale(&["bundlekit", "candidates", "zh-Hant-TW"])]
fn rejects_incomplete_invocations(#[case] argv: &[&str]) {
    assert!(Cli::try_parse_from(argv).is_err());
}

#[test]
fn help_examples_parse() {
    let help = Cli::command()
        .get_after_help()
        .map(ToString::to_string)
        .expect("after_help is set");
    let examples: Vec<&str> = help
        .lines()
        .filter_map(|line| line.trim().strip_prefix("$ "))
        .collect();

    assert_eq!(examples.len(), 3);
    for example in examples {
        assert!(
            Cli::try_parse_from(example.split_whitespace()).is_ok(),
            "help example does not parse: {example}"
        );
    }
}
