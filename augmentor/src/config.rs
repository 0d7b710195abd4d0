//! Runner configuration resolved from CLI, environment, TOML and defaults

use augmentor_common::config::{resolve_path, CompiledDefaults, TomlConfig};
use std::path::PathBuf;

/// What to do when a single file fails to process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop the run at the first failing file
    #[default]
    Abort,
    /// Log the failure, record it in the summary and continue
    Skip,
}

/// Values given on the command line or through bound environment variables
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub noise_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub continue_on_error: bool,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub background_noise_dir: PathBuf,
    /// Input extension without the leading dot
    pub extension: String,
    pub seed: Option<u64>,
    pub error_policy: ErrorPolicy,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        let defaults = CompiledDefaults::default();
        Self {
            input_dir: defaults.input_dir,
            output_dir: defaults.output_dir,
            background_noise_dir: defaults.background_noise_dir,
            extension: defaults.extension,
            seed: None,
            error_policy: ErrorPolicy::Abort,
        }
    }
}

impl RunnerConfig {
    /// Merge CLI/environment overrides over the TOML file over compiled defaults
    pub fn from_sources(cli: &CliOverrides, toml: &TomlConfig) -> Self {
        let defaults = CompiledDefaults::default();

        let extension = toml
            .extension
            .as_deref()
            .map(|e| e.trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or(defaults.extension.clone());

        let skip = cli.continue_on_error || toml.continue_on_error.unwrap_or(false);

        Self {
            input_dir: resolve_path(
                cli.input_dir.as_deref(),
                toml.input_dir.as_deref(),
                &defaults.input_dir,
            ),
            output_dir: resolve_path(
                cli.output_dir.as_deref(),
                toml.output_dir.as_deref(),
                &defaults.output_dir,
            ),
            background_noise_dir: resolve_path(
                cli.noise_dir.as_deref(),
                toml.background_noise_dir.as_deref(),
                &defaults.background_noise_dir,
            ),
            extension,
            seed: cli.seed.or(toml.seed),
            error_policy: if skip { ErrorPolicy::Skip } else { ErrorPolicy::Abort },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_nothing_configured() {
        let config = RunnerConfig::from_sources(&CliOverrides::default(), &TomlConfig::default());
        assert_eq!(config, RunnerConfig::default());
        assert_eq!(config.input_dir, PathBuf::from("audio"));
        assert_eq!(config.output_dir, PathBuf::from("augmented"));
        assert_eq!(config.extension, "mp3");
        assert_eq!(config.error_policy, ErrorPolicy::Abort);
    }

    #[test]
    fn test_cli_overrides_toml() {
        let toml = TomlConfig {
            input_dir: Some(PathBuf::from("/data/in")),
            output_dir: Some(PathBuf::from("/data/out")),
            seed: Some(1),
            ..Default::default()
        };
        let cli = CliOverrides {
            input_dir: Some(PathBuf::from("/cli/in")),
            seed: Some(99),
            ..Default::default()
        };

        let config = RunnerConfig::from_sources(&cli, &toml);

        assert_eq!(config.input_dir, PathBuf::from("/cli/in"));
        assert_eq!(config.output_dir, PathBuf::from("/data/out"));
        assert_eq!(config.background_noise_dir, PathBuf::from("background_noise"));
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn test_extension_from_toml_strips_dot() {
        let toml = TomlConfig {
            extension: Some(".wav".to_string()),
            ..Default::default()
        };
        let config = RunnerConfig::from_sources(&CliOverrides::default(), &toml);
        assert_eq!(config.extension, "wav");
    }

    #[test]
    fn test_continue_on_error_from_either_source() {
        let toml = TomlConfig {
            continue_on_error: Some(true),
            ..Default::default()
        };
        assert_eq!(
            RunnerConfig::from_sources(&CliOverrides::default(), &toml).error_policy,
            ErrorPolicy::Skip
        );

        let cli = CliOverrides {
            continue_on_error: true,
            ..Default::default()
        };
        assert_eq!(
            RunnerConfig::from_sources(&cli, &TomlConfig::default()).error_policy,
            ErrorPolicy::Skip
        );
    }
}
