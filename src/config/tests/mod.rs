//! Unit tests for config module
//!
//! Tests settings defaults, parsing and validation.
//! Filesystem access goes through temporary directories only.

#![allow(clippy::panic)]

use std::fs;

use tempfile::TempDir;

use crate::{
    BusError,
    config::{BusSettings, ConfigPaths, LogLevel},
    config_bus::DispatchLimits,
};

#[test]
fn settings_default() {
    let settings = BusSettings::default();

    assert_eq!(settings.general.log_level, LogLevel::Info);
    assert!(settings.dispatch.cycle_detection);
    assert_eq!(settings.dispatch.limits(), DispatchLimits::default());
}

#[test]
fn settings_serialize_toml() {
    let settings = BusSettings::default();

    let toml_str = toml::to_string(&settings).unwrap();
    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[dispatch]"));
    assert!(toml_str.contains("max_depth = 64"));
}

#[test]
fn settings_deserialize_toml() {
    let toml_str = r#"
        [general]
        log_level = "debug"

        [dispatch]
        cycle_detection = false
        max_depth = 8
    "#;

    let settings = BusSettings::from_toml_str(toml_str).unwrap();

    assert_eq!(settings.general.log_level, LogLevel::Debug);
    assert!(!settings.dispatch.cycle_detection);
    assert_eq!(settings.dispatch.max_depth, 8);
}

#[test]
fn settings_empty_toml() {
    let settings = BusSettings::from_toml_str("").unwrap();

    assert_eq!(settings, BusSettings::default());
}

#[test]
fn settings_partial_section_keeps_other_defaults() {
    let settings = BusSettings::from_toml_str("[dispatch]\nmax_depth = 3\n").unwrap();

    assert_eq!(settings.dispatch.max_depth, 3);
    assert!(settings.dispatch.cycle_detection);
    assert_eq!(settings.general.log_level, LogLevel::Info);
}

#[test]
fn settings_invalid_toml() {
    let invalid_toml = r#"
        [general
        invalid syntax here
    "#;

    let result = BusSettings::from_toml_str(invalid_toml);

    assert!(matches!(result, Err(BusError::Settings { .. })));
}

#[test]
fn settings_unknown_log_level_rejected() {
    let result = BusSettings::from_toml_str("[general]\nlog_level = \"loud\"\n");

    assert!(matches!(result, Err(BusError::Settings { .. })));
}

#[test]
fn settings_zero_depth_rejected() {
    let result = BusSettings::from_toml_str("[dispatch]\nmax_depth = 0\n");

    let Err(BusError::Settings { details, .. }) = result else {
        panic!("expected settings error");
    };
    assert!(details.contains("max_depth"));
}

#[test]
fn settings_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.toml");
    fs::write(&path, "[general]\nlog_level = \"trace\"\n").unwrap();

    let settings = BusSettings::load(&path).unwrap();

    assert_eq!(settings.general.log_level, LogLevel::Trace);
}

#[test]
fn settings_load_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    let result = BusSettings::load(&path);

    assert!(matches!(result, Err(BusError::Io(_))));
}

#[test]
fn settings_load_reports_file_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "[dispatch]\nmax_depth = \"deep\"\n").unwrap();

    let Err(BusError::Settings { path: reported, .. }) = BusSettings::load(&path) else {
        panic!("expected settings error");
    };

    assert!(reported.ends_with("broken.toml"));
}

#[test]
fn log_level_directives() {
    assert_eq!(LogLevel::Error.as_directive(), "error");
    assert_eq!(LogLevel::Trace.to_string(), "trace");
}

#[test]
fn config_paths_settings_file() {
    if std::env::var("HOME").is_ok() || std::env::var("XDG_CONFIG_HOME").is_ok() {
        let path = ConfigPaths::settings_file().unwrap();

        assert!(path.ends_with("figura/settings.toml"));
    }
}
