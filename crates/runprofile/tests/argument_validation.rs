// Test module - relaxed lint rules
#![allow(clippy::default_trait_access)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::panic)]
#![allow(clippy::manual_assert)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(missing_docs)]

use runprofile::arguments::{ArgumentError, ArgumentParser, OptionGrammar, OptionSpec, DOES_NOT_EXECUTE};
use runprofile::model::ProfileKind;
use runprofile::profile::RunProfile;

fn validate(text: &str) -> Option<String> {
    RunProfile::new(ProfileKind::Pybot).validate_arguments(text)
}

#[test]
fn known_options_are_accepted() {
    assert_eq!(validate(""), None);
    assert_eq!(validate("--include=smoke"), None);
    assert_eq!(validate("--include smoke -e slow --loglevel=TRACE"), None);
    assert_eq!(validate("-L DEBUG -d/tmp/out --dryrun --nodryrun"), None);
    assert_eq!(validate("--variable HOST:localhost -v PORT:80"), None);
}

#[test]
fn unknown_option_is_named_in_message() {
    let message = validate("--unknownflag").unwrap();
    assert!(message.contains("--unknownflag"), "{message}");
    assert!(message.starts_with("Unknown option(s):"));
}

#[test]
fn positional_tokens_are_reported_in_order() {
    assert_eq!(
        validate("tests --dryrun -q more").as_deref(),
        Some("Unknown option(s): tests -q more")
    );
}

#[test]
fn help_and_version_do_not_execute() {
    assert_eq!(validate("--help").as_deref(), Some(DOES_NOT_EXECUTE));
    assert_eq!(validate("-h").as_deref(), Some(DOES_NOT_EXECUTE));
    assert_eq!(validate("-?").as_deref(), Some(DOES_NOT_EXECUTE));
    assert_eq!(validate("--dryrun --version").as_deref(), Some(DOES_NOT_EXECUTE));
}

#[test]
fn parse_errors_use_parser_text() {
    assert_eq!(
        validate("--include").as_deref(),
        Some("option --include requires argument")
    );
    assert_eq!(
        validate("--re x").as_deref(),
        Some("option --re not a unique prefix")
    );
    assert_eq!(
        validate("--dryrun=yes").as_deref(),
        Some("option --dryrun must not have an argument")
    );
}

#[test]
fn syntax_error_wins_over_help() {
    assert_eq!(
        validate("--help --outputdir").as_deref(),
        Some("option --outputdir requires argument")
    );
}

#[test]
fn custom_script_accepts_any_arguments() {
    let profile = RunProfile::new(ProfileKind::CustomScript);
    assert_eq!(profile.validate_arguments("--anything goes --help"), None);
}

#[test]
fn parser_records_values_and_negations() {
    let parser = ArgumentParser::default();
    let parsed = parser.parse(&["--incl=a", "-ib", "--nodryrun", "--", "--x"]).unwrap();
    let names: Vec<_> = parsed.options.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["include", "include", "nodryrun"]);
    assert_eq!(parsed.options[0].value.as_deref(), Some("a"));
    assert_eq!(parsed.options[1].value.as_deref(), Some("b"));
    assert_eq!(parsed.invalid, vec!["--x"]);
}

#[test]
fn custom_grammar_can_be_supplied() {
    let parser = ArgumentParser::new(OptionGrammar::new(vec![
        OptionSpec::value("target", "t"),
        OptionSpec::flag("help", "h"),
    ]));
    assert!(parser.parse_str("--target x").unwrap().invalid.is_empty());
    assert_eq!(parser.parse_str("-h"), Err(ArgumentError::Information));
    assert_eq!(
        parser.parse_str("--include x").unwrap().invalid,
        vec!["--include", "x"]
    );
}
