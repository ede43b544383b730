//! Tests for keyword spec resolution from the command line.
// Test module - relaxed lint rules
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use std::fs;
use std::process::{Command, Output};

const SPEC: &str = r#"{"name": "LibSpecLibrary", "keywords": [
    {"name": "Normal Keyword", "args": ["foo"], "doc": "This is kw documentation.\n\nThis is more docs."},
    {"name": "Multiarg Keyword", "args": ["arg1", "arg2=default value", "*args"]}
]}"#;

fn resolve(dir: &std::path::Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_runprofile"))
        .arg("--settings")
        .arg(dir.join("settings.json"))
        .arg("resolve")
        .args(args)
        .env_remove("PYTHONPATH")
        .output()
        .expect("failed to execute")
}

#[test]
fn resolves_from_given_directory_before_default() {
    let root = tempfile::tempdir().unwrap();
    let mine = root.path().join("mine");
    let default_dir = root.path().join("default");
    fs::create_dir_all(&mine).unwrap();
    fs::create_dir_all(&default_dir).unwrap();
    fs::write(mine.join("LibSpecLibrary.json"), SPEC).unwrap();
    fs::write(default_dir.join("LibSpecLibrary.json"), r#"{"name": "Default"}"#).unwrap();

    let output = resolve(
        root.path(),
        &[
            "LibSpecLibrary",
            "--dir",
            mine.to_str().unwrap(),
            "--default-dir",
            default_dir.to_str().unwrap(),
            "--json",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["discovery"]["step"]["backend"], "directory");
    assert_eq!(payload["spec"]["name"], "LibSpecLibrary");
    assert_eq!(payload["spec"]["keywords"].as_array().unwrap().len(), 2);
}

#[test]
fn plain_output_lists_keyword_arguments() {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("LibSpecLibrary.json"), SPEC).unwrap();
    let output = resolve(
        root.path(),
        &["LibSpecLibrary", "--default-dir", root.path().to_str().unwrap()],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Normal Keyword [ foo ]"), "{stdout}");
    assert!(stdout.contains("Multiarg Keyword [ arg1 | arg2=default value | *args ]"));
}

#[test]
fn config_file_supplies_pythonpath() {
    let root = tempfile::tempdir().unwrap();
    let site = root.path().join("site");
    fs::create_dir_all(&site).unwrap();
    fs::write(site.join("LibSpecLibrary.json"), SPEC).unwrap();
    let config = root.path().join("resolver.yaml");
    fs::write(
        &config,
        format!(
            "pythonpath:\n  - '{}'\nuse_env_pythonpath: false\ndefault_directory: '{}'\n",
            site.display(),
            root.path().join("empty").display(),
        ),
    )
    .unwrap();

    let output = resolve(
        root.path(),
        &["LibSpecLibrary", "--config", config.to_str().unwrap(), "--json"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["discovery"]["step"]["backend"], "pythonpath");
}

#[test]
fn unknown_library_exits_with_not_found() {
    let root = tempfile::tempdir().unwrap();
    let output = resolve(
        root.path(),
        &["FooBarZoo", "--default-dir", root.path().to_str().unwrap(), "--json"],
    );
    assert_eq!(output.status.code(), Some(5));
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["code"], "E_NOT_FOUND");
    assert_eq!(payload["context"]["searched"].as_array().unwrap().len(), 2);
}

#[test]
fn completions_are_generated() {
    let output = Command::new(env!("CARGO_BIN_EXE_runprofile"))
        .args(["completions", "bash"])
        .output()
        .expect("failed to execute");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("runprofile"));
}

#[test]
fn resolves_libdoc_xml_spec() {
    let root = tempfile::tempdir().unwrap();
    fs::write(
        root.path().join("Lib.xml"),
        r#"<keywordspec name="Lib" format="ROBOT"><version>2.0</version>
<kw name="Open Thing"><arguments><arg>path</arg><arg>mode=r</arg></arguments><doc>Opens.</doc></kw>
</keywordspec>"#,
    )
    .unwrap();
    fs::write(root.path().join("Lib.json"), SPEC).unwrap();

    let output = resolve(
        root.path(),
        &["Lib", "--default-dir", root.path().to_str().unwrap()],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Lib.xml"), "{stdout}");
    assert!(stdout.contains("Open Thing [ path | mode=r ]"), "{stdout}");
}
