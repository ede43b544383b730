// Test module - relaxed lint rules
#![allow(clippy::default_trait_access)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::panic)]
#![allow(clippy::manual_assert)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(missing_docs)]

use runprofile::model::{ProfileKind, Setting};
use runprofile::profile::RunProfile;
use runprofile::settings::{JsonSettingsStore, SettingsStore, DEFAULT_SAVE_DELAY};
use std::fs;
use std::time::{Duration, Instant};

fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn missing_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSettingsStore::open(dir.path().join("settings.json")).unwrap();
    assert_eq!(store.get("pybot_arguments"), None);
    assert!(!store.is_dirty());
}

#[test]
fn save_is_deferred_until_deadline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let mut store = JsonSettingsStore::open(&path).unwrap();
    let start = Instant::now();
    store.save_at("pybot_arguments", serde_json::json!("--dryrun"), start);

    assert!(!path.exists());
    assert!(!store.tick(start + Duration::from_secs(1)).unwrap());
    assert!(store.tick(start + DEFAULT_SAVE_DELAY).unwrap());
    assert_eq!(read_json(&path)["pybot_arguments"], "--dryrun");
    assert!(!store.is_dirty());
    assert_eq!(store.pending_deadline(), None);
}

#[test]
fn rapid_edits_coalesce_into_one_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let mut store = JsonSettingsStore::open(&path)
        .unwrap()
        .with_delay(Duration::from_millis(500));
    let start = Instant::now();
    store.save_at("pybot_include_tags", serde_json::json!("s"), start);
    store.save_at(
        "pybot_include_tags",
        serde_json::json!("sm"),
        start + Duration::from_millis(400),
    );
    assert!(!store.tick(start + Duration::from_millis(600)).unwrap());
    assert!(store.tick(start + Duration::from_millis(900)).unwrap());
    assert_eq!(read_json(&path)["pybot_include_tags"], "sm");
}

#[test]
fn flush_writes_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");
    let mut store = JsonSettingsStore::open(&path).unwrap();
    let mut profile = RunProfile::new(ProfileKind::Pybot);
    profile
        .set_setting(Setting::ApplyExcludeTags(true), &mut store)
        .unwrap();
    store.flush().unwrap();
    assert_eq!(read_json(&path)["pybot_apply_exclude_tags"], true);
}

#[test]
fn dropping_the_store_flushes_pending_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    {
        let mut store = JsonSettingsStore::open(&path).unwrap();
        store.save("custom_script_runner_script", serde_json::json!("/x/run.sh"));
    }
    let reopened = JsonSettingsStore::open(&path).unwrap();
    let profile = RunProfile::load(ProfileKind::CustomScript, &reopened);
    assert_eq!(profile.command(), "/x/run.sh");
}

#[test]
fn corrupt_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{not json").unwrap();
    let err = JsonSettingsStore::open(&path).unwrap_err();
    assert_eq!(err.code, "E_PROTOCOL");
}
