//! Integration tests for configuration file loading
//!
//! Run with: `cargo test -p ctlrobot --test config_tests`

use ctlrobot::config::{RobotConfig, expand_path};
use std::fs;
use std::time::Duration;

const FULL_CONFIG: &str = r#"
log_level = "debug"
debug = false
timeout_ms = 2000
reattach_kernel_driver = false
"#;

#[test]
fn test_load_full_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ctlrobot.toml");
    fs::write(&path, FULL_CONFIG).unwrap();

    let config = RobotConfig::load(&path).unwrap();
    assert_eq!(config.log_level, "debug");
    assert!(!config.debug);
    assert_eq!(config.timeout(), Duration::from_secs(2));
    assert!(!config.reattach_kernel_driver);
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config = RobotConfig::parse("debug = false").unwrap();
    assert!(!config.debug);
    assert_eq!(config.log_level, "warn");
    assert_eq!(config.timeout_ms, 5000);
    assert!(config.reattach_kernel_driver);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = RobotConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read config file"));
}

#[test]
fn test_unknown_key_rejected() {
    assert!(RobotConfig::parse("vendor_id = 0x1234").is_err());
}

#[test]
fn test_invalid_log_level_rejected() {
    let err = RobotConfig::parse(r#"log_level = "chatty""#).unwrap_err();
    assert!(err.to_string().contains("Invalid log level"));
}

#[test]
fn test_wrong_type_rejected() {
    assert!(RobotConfig::parse(r#"timeout_ms = "soon""#).is_err());
}

#[test]
fn test_expand_tilde() {
    let expanded = expand_path("~/robot.toml");
    assert!(expanded.ends_with("robot.toml"));
    if std::env::var_os("HOME").is_some() {
        assert!(!expanded.starts_with("~"));
    }
}
