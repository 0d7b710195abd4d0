//! Bootstrap configuration loading and path resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (bound through the CLI parser)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Steps 1 and 2 are owned by the binary. This module covers 3 and 4.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory under the platform config dir that holds augmentor config
pub const CONFIG_DIR_NAME: &str = "augmentor";

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "augmentor.toml";

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional. Missing fields fall back to [`CompiledDefaults`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Directory scanned for input audio
    #[serde(default)]
    pub input_dir: Option<PathBuf>,

    /// Directory receiving augmented audio and metadata sidecars
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Directory holding background noise recordings
    #[serde(default)]
    pub background_noise_dir: Option<PathBuf>,

    /// Input file extension without the leading dot (e.g. "mp3")
    #[serde(default)]
    pub extension: Option<String>,

    /// RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,

    /// Skip failing files instead of aborting the run
    #[serde(default)]
    pub continue_on_error: Option<bool>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Compiled-in defaults used when neither CLI, environment nor TOML set a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub background_noise_dir: PathBuf,
    pub extension: String,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("audio"),
            output_dir: PathBuf::from("augmented"),
            background_noise_dir: PathBuf::from("background_noise"),
            extension: "mp3".to_string(),
            log_level: default_log_level(),
        }
    }
}

/// Where the bootstrap configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// File named explicitly on the command line or environment
    Explicit(PathBuf),
    /// File found at the platform default location
    PlatformDefault(PathBuf),
    /// No file found; compiled defaults only
    CompiledDefaults,
}

/// Loaded TOML config plus its origin, reported once logging is up
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub toml: TomlConfig,
    pub source: ConfigSource,
}

/// Platform default config file path
///
/// Linux: `~/.config/augmentor/augmentor.toml`
/// macOS: `~/Library/Application Support/augmentor/augmentor.toml`
/// Windows: `%APPDATA%\augmentor\augmentor.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load bootstrap configuration
///
/// An explicitly named file must exist and parse. The platform default file
/// is optional: when absent, compiled defaults are used and startup continues.
pub fn load_bootstrap_config(explicit: Option<&Path>) -> Result<BootstrapConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(BootstrapConfig {
            toml: load_toml_config(path)?,
            source: ConfigSource::Explicit(path.to_path_buf()),
        });
    }

    match default_config_path() {
        Some(path) if path.exists() => Ok(BootstrapConfig {
            toml: load_toml_config(&path)?,
            source: ConfigSource::PlatformDefault(path),
        }),
        _ => Ok(BootstrapConfig {
            toml: TomlConfig::default(),
            source: ConfigSource::CompiledDefaults,
        }),
    }
}

/// Resolve a path setting: CLI/environment → TOML → compiled default
pub fn resolve_path(cli_value: Option<&Path>, toml_value: Option<&Path>, default: &Path) -> PathBuf {
    cli_value
        .or(toml_value)
        .unwrap_or(default)
        .to_path_buf()
}
