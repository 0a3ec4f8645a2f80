//! Loading knowledge base files from disk.

use ahu_common::{AlarmMatcher, KnowledgeBase, KnowledgeBaseError, Severity};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const BOILER_KB: &str = r#"
schema_version = 1

[[categories]]
id = "boiler_lockout"
keywords = ["boiler lockout", "flame failure"]
reasons = ["Flame not proven during ignition.", "Gas valve closed."]
actions = ["Check flame rod and ignition.", "Verify gas supply pressure."]
severity = "critical"

[[categories]]
id = "boiler_low_water"
keywords = ["low water", "lwco"]
reasons = ["Low water cutoff tripped."]
actions = ["Check make-up water and expansion tank."]
severity = "warning"
"#;

fn write_kb(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("alarms.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_kb(&dir, BOILER_KB);

    let kb = KnowledgeBase::load_from(&path).unwrap();
    assert_eq!(kb.len(), 2);
    assert_eq!(kb.source(), Some(path.as_path()));

    let lockout = kb.get("boiler_lockout").unwrap();
    assert_eq!(lockout.severity, Severity::Critical);
    assert_eq!(lockout.reasons[0], "Flame not proven during ignition.");
}

#[test]
fn test_loaded_kb_drives_matching() {
    let dir = TempDir::new().unwrap();
    let kb = KnowledgeBase::load_from(&write_kb(&dir, BOILER_KB)).unwrap();
    let matcher = AlarmMatcher::with_defaults(Arc::new(kb));

    assert_eq!(
        matcher.diagnose("B-1 FLAME FAILURE, LWCO OK"),
        vec!["boiler_lockout".to_string(), "boiler_low_water".to_string()]
    );
    assert!(matcher.diagnose("Mixed air low limit trip").is_empty());
}

#[test]
fn test_schema_version_is_optional() {
    let dir = TempDir::new().unwrap();
    let contents = BOILER_KB.replace("schema_version = 1", "");
    let kb = KnowledgeBase::load_from(&write_kb(&dir, &contents)).unwrap();
    assert_eq!(kb.len(), 2);
}

#[test]
fn test_duplicate_id_in_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let contents = BOILER_KB.replace("boiler_low_water", "boiler_lockout");
    let err = KnowledgeBase::load_from(&write_kb(&dir, &contents)).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::DuplicateId(ref id) if id == "boiler_lockout"));
}

#[test]
fn test_empty_reasons_in_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let contents = BOILER_KB.replace(
        r#"reasons = ["Low water cutoff tripped."]"#,
        "reasons = []",
    );
    let err = KnowledgeBase::load_from(&write_kb(&dir, &contents)).unwrap_err();
    assert_eq!(err.code(), "kb_no_reasons");
}

#[test]
fn test_unknown_severity_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let contents = BOILER_KB.replace(r#"severity = "warning""#, r#"severity = "urgent""#);
    let err = KnowledgeBase::load_from(&write_kb(&dir, &contents)).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::Parse { .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = KnowledgeBase::load_from(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::Io { .. }));
}

#[test]
fn test_exported_catalog_reloads_identically() {
    let dir = TempDir::new().unwrap();
    let builtin = KnowledgeBase::new();
    let path = write_kb(&dir, &builtin.to_toml().unwrap());

    let reloaded = KnowledgeBase::load_from(&path).unwrap();
    assert_eq!(reloaded.categories(), builtin.categories());

    let a = AlarmMatcher::with_defaults(Arc::new(builtin));
    let b = AlarmMatcher::with_defaults(Arc::new(reloaded));
    let text = "Filter DP high on AHU F201";
    assert_eq!(a.diagnose(text), b.diagnose(text));
}
