//! Tests for bootstrap configuration loading and graceful degradation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate XDG_CONFIG_HOME are marked with #[serial].

use augmentor_common::config::{
    load_bootstrap_config, load_toml_config, ConfigSource, LoggingConfig,
    TomlConfig,
};
use augmentor_common::Error;
use serial_test::serial;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_load_full_toml_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("augmentor.toml");
    std::fs::write(
        &path,
        r#"
input_dir = "/data/in"
output_dir = "/data/out"
background_noise_dir = "/data/noise"
extension = "wav"
seed = 42
continue_on_error = true

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap();

    assert_eq!(config.input_dir, Some(PathBuf::from("/data/in")));
    assert_eq!(config.output_dir, Some(PathBuf::from("/data/out")));
    assert_eq!(config.background_noise_dir, Some(PathBuf::from("/data/noise")));
    assert_eq!(config.extension.as_deref(), Some("wav"));
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.continue_on_error, Some(true));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_partial_toml_uses_defaults_for_missing_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("augmentor.toml");
    std::fs::write(&path, "seed = 7\n").unwrap();

    let config = load_toml_config(&path).unwrap();

    assert_eq!(config.seed, Some(7));
    assert!(config.input_dir.is_none());
    assert_eq!(config.logging, LoggingConfig::default());
}

#[test]
fn test_malformed_toml_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("augmentor.toml");
    std::fs::write(&path, "seed = \"not a number\"\n").unwrap();

    assert!(matches!(load_toml_config(&path), Err(Error::Config(_))));
}

#[test]
fn test_unknown_key_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("augmentor.toml");
    std::fs::write(&path, "min_gain_db = -6\n").unwrap();

    assert!(matches!(load_toml_config(&path), Err(Error::Config(_))));
}

#[test]
fn test_explicit_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    assert!(matches!(
        load_bootstrap_config(Some(&path)),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_explicit_file_reports_source() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "extension = \"wav\"\n").unwrap();

    let bootstrap = load_bootstrap_config(Some(&path)).unwrap();

    assert_eq!(bootstrap.source, ConfigSource::Explicit(path));
    assert_eq!(bootstrap.toml.extension.as_deref(), Some("wav"));
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_missing_default_file_falls_back_to_compiled_defaults() {
    let dir = TempDir::new().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let bootstrap = load_bootstrap_config(None).unwrap();

    assert_eq!(bootstrap.source, ConfigSource::CompiledDefaults);
    assert_eq!(bootstrap.toml, TomlConfig::default());

    std::env::remove_var("XDG_CONFIG_HOME");
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_platform_default_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let path = dir.path().join("augmentor").join("augmentor.toml");
    let config = TomlConfig {
        seed: Some(99),
        ..Default::default()
    };
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

    let bootstrap = load_bootstrap_config(None).unwrap();

    assert_eq!(bootstrap.source, ConfigSource::PlatformDefault(path));
    assert_eq!(bootstrap.toml.seed, Some(99));

    std::env::remove_var("XDG_CONFIG_HOME");
}
