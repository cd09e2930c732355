//! Integration-level unit tests for the SettingsEngine public API.
//!
//! These tests exercise the SettingsEngine through its public trait interface,
//! validating default loading, partial files and error reporting.

use std::fs;

use privacy_sentinel::services::settings_engine::{
    SettingsEngine, SettingsEngineTrait, ENGINE_FILE, SETTINGS_FILE,
};
use privacy_sentinel::types::errors::SettingsError;
use privacy_sentinel::types::settings::{EngineConfig, Settings};
use tempfile::TempDir;

/// Helper: create a SettingsEngine backed by a temp directory that lives for the
/// duration of the test (the caller holds the `TempDir` handle).
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    SettingsEngine::new(Some(dir.path().to_path_buf()))
}

/// With no settings file the engine starts with blocking and notifications on
/// and no custom domains.
#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings, Settings::default());
    assert!(settings.blocking_enabled);
    assert!(settings.notifications_enabled);
    assert!(settings.custom_domains.is_empty());
}

/// A complete settings file is read field by field using the camelCase keys.
#[test]
fn test_load_reads_camel_case_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(SETTINGS_FILE),
        r#"{
            "blockingEnabled": false,
            "notificationsEnabled": false,
            "customDomains": ["evil.example", "ads.test"]
        }"#,
    )
    .unwrap();
    let engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert!(!settings.blocking_enabled);
    assert!(!settings.notifications_enabled);
    assert_eq!(settings.custom_domains, vec!["evil.example", "ads.test"]);
}

/// Malformed JSON is a serialization error, never a silent default.
#[test]
fn test_load_rejects_malformed_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(SETTINGS_FILE), "{ not json").unwrap();
    let engine = engine_in_temp(&dir);

    let result = engine.load();

    assert!(
        matches!(result, Err(SettingsError::SerializationError(_))),
        "expected SerializationError, got {:?}",
        result
    );
}

/// A directory where the file should be cannot be read as a file.
#[test]
fn test_load_reports_io_error() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join(SETTINGS_FILE)).unwrap();
    let engine = engine_in_temp(&dir);

    assert!(matches!(engine.load(), Err(SettingsError::IoError(_))));
}

/// Every load reads the file again; the engine holds no settings of its own,
/// and loading never writes to disk.
#[test]
fn test_load_reflects_file_changes_without_writing() {
    let dir = TempDir::new().unwrap();
    let engine = engine_in_temp(&dir);
    assert_eq!(engine.load().unwrap(), Settings::default());
    assert!(!dir.path().join(SETTINGS_FILE).exists());

    fs::write(
        dir.path().join(SETTINGS_FILE),
        r#"{"customDomains": ["late.example"]}"#,
    )
    .unwrap();

    let settings = engine.load().unwrap();
    assert_eq!(settings.custom_domains, vec!["late.example"]);
    assert!(settings.blocking_enabled);
}

/// Engine tunables default to 30 s fetch timeout, 100/20 snapshot bounds and
/// the public EasyList mirrors.
#[test]
fn test_engine_config_defaults() {
    let dir = TempDir::new().unwrap();
    let engine = engine_in_temp(&dir);

    let config = engine.load_engine_config().unwrap();

    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.fetch_timeout_secs, 30);
    assert_eq!(config.snapshot_request_limit, 100);
    assert_eq!(config.snapshot_signal_limit, 20);
    assert!(!config.easylist_mirrors.is_empty());
}

/// Partial engine files override only the keys they name.
#[test]
fn test_engine_config_partial_override() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(ENGINE_FILE),
        r#"{"easylist_mirrors": ["http://127.0.0.1:9/list.txt"], "retention_limit": 10}"#,
    )
    .unwrap();
    let engine = engine_in_temp(&dir);

    let config = engine.load_engine_config().unwrap();

    assert_eq!(config.easylist_mirrors, vec!["http://127.0.0.1:9/list.txt"]);
    assert_eq!(config.retention_limit, 10);
    assert_eq!(config.fetch_timeout_secs, 30);
    assert_eq!(config.snapshot_limits().requests, 100);
}

#[test]
fn test_config_dir_override() {
    let dir = TempDir::new().unwrap();
    let engine = engine_in_temp(&dir);
    assert_eq!(engine.get_config_dir(), dir.path());
}
