//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! Overrides > Environment variables > Config file > Defaults

use aoi_core::config::{ConfigOverrides, ConfigSource, LayeredConfig, NEAREST_LIMIT_HARD_CAP};
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const ENV_KEYS: [&str; 5] = [
    "AOI_NEAREST_DEFAULT_LIMIT",
    "AOI_NEAREST_MAX_LIMIT",
    "AOI_NEAREST_PREFILTER_FACTOR",
    "AOI_INTERSECTS_MARGIN_DEG",
    "AOI_INCLUDE_INACTIVE",
];

fn clear_env() {
    for key in ENV_KEYS {
        env::remove_var(key);
    }
}

#[test]
fn test_defaults_resolve_to_documented_engine_config() {
    let engine = LayeredConfig::with_defaults().resolve().unwrap();

    assert_eq!(engine.nearest_default_limit, 5);
    assert_eq!(engine.nearest_max_limit, NEAREST_LIMIT_HARD_CAP);
    assert_eq!(engine.nearest_prefilter_factor, 4);
    assert_eq!(engine.intersects_margin_deg, 1.0);
    assert!(!engine.include_inactive_by_default);
}

#[test]
fn test_partial_file_configuration() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
intersects_margin_deg = 0.25
# Only override the margin, leave others as defaults
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.intersects_margin_deg.value, 0.25);
    assert_eq!(config.intersects_margin_deg.source, ConfigSource::File);
    assert_eq!(config.nearest_default_limit.value, 5);
    assert_eq!(config.nearest_default_limit.source, ConfigSource::Default);
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("AOI_NEAREST_DEFAULT_LIMIT", "7");
    env::set_var("AOI_INCLUDE_INACTIVE", "yes");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
nearest_default_limit = 3
include_inactive_by_default = false
nearest_prefilter_factor = 8
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.nearest_default_limit.value, 7);
    assert_eq!(config.nearest_default_limit.source, ConfigSource::Environment);
    assert!(config.include_inactive_by_default.value);
    assert_eq!(config.include_inactive_by_default.source, ConfigSource::Environment);
    // Not set in the environment, so the file value stays
    assert_eq!(config.nearest_prefilter_factor.value, 8);
    assert_eq!(config.nearest_prefilter_factor.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var("AOI_NEAREST_MAX_LIMIT", "lots");
    env::set_var("AOI_INTERSECTS_MARGIN_DEG", "wide");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.nearest_max_limit.value, 25);
    assert_eq!(config.nearest_max_limit.source, ConfigSource::Default);
    assert_eq!(config.intersects_margin_deg.source, ConfigSource::Default);

    clear_env();
}

#[test]
#[serial]
fn test_overrides_beat_environment() {
    clear_env();
    env::set_var("AOI_INTERSECTS_MARGIN_DEG", "2.5");

    let mut config = LayeredConfig::with_defaults().load_from_env();
    assert_eq!(config.intersects_margin_deg.value, 2.5);

    config.apply_overrides(ConfigOverrides {
        intersects_margin_deg: Some(0.5),
        ..Default::default()
    });

    assert_eq!(config.intersects_margin_deg.value, 0.5);
    assert_eq!(config.intersects_margin_deg.source, ConfigSource::Override);

    assert!(ConfigSource::Override.precedence() > ConfigSource::Environment.precedence());
    assert!(ConfigSource::Environment.precedence() > ConfigSource::File.precedence());
    assert!(ConfigSource::File.precedence() > ConfigSource::Default.precedence());

    clear_env();
}

#[test]
#[serial]
fn test_environment_cannot_lift_limit_past_hard_cap() {
    clear_env();
    env::set_var("AOI_NEAREST_MAX_LIMIT", "500");

    let config = LayeredConfig::with_defaults().load_from_env();
    assert_eq!(config.nearest_max_limit.value, 500);
    assert!(config.resolve().is_err());

    clear_env();
}

#[test]
fn test_invalid_toml_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "invalid toml content [[[").unwrap();

    let result = LayeredConfig::with_defaults().load_from_file(file.path());

    assert!(result.is_err());
}

#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let non_existent = temp_dir.path().join("does_not_exist.toml");

    let result = LayeredConfig::with_defaults().load_from_file(&non_existent);

    assert!(result.is_err());
}

#[test]
fn test_file_written_to_disk_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("aoi.toml");
    fs::write(
        &config_path,
        r#"
nearest_default_limit = 10
nearest_max_limit = 20
nearest_prefilter_factor = 2
intersects_margin_deg = 0.0
include_inactive_by_default = true
"#,
    )
    .unwrap();

    let engine = LayeredConfig::with_defaults()
        .load_from_file(&config_path)
        .unwrap()
        .resolve()
        .unwrap();

    assert_eq!(engine.nearest_default_limit, 10);
    assert_eq!(engine.nearest_max_limit, 20);
    assert_eq!(engine.nearest_prefilter_factor, 2);
    assert_eq!(engine.intersects_margin_deg, 0.0);
    assert!(engine.include_inactive_by_default);
}
