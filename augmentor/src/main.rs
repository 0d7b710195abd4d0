//! augmentor - batch audio augmentation CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use augmentor::{AugmentationChain, CliOverrides, PipelineRunner, RunnerConfig};
use augmentor_common::config::{load_bootstrap_config, ConfigSource};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for augmentor
#[derive(Parser, Debug)]
#[command(name = "augmentor")]
#[command(about = "Apply audio augmentations to a directory of recordings")]
#[command(version)]
struct Args {
    /// TOML config file (default: platform config dir)
    #[arg(short, long, env = "AUGMENTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Directory containing input audio
    #[arg(short, long, env = "AUGMENTOR_INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Directory receiving augmented audio and metadata
    #[arg(short, long, env = "AUGMENTOR_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Directory of background noise recordings
    #[arg(short, long, env = "AUGMENTOR_NOISE_DIR")]
    noise_dir: Option<PathBuf>,

    /// RNG seed for reproducible runs
    #[arg(short, long, env = "AUGMENTOR_SEED")]
    seed: Option<u64>,

    /// Skip files that fail instead of aborting the run
    #[arg(long)]
    continue_on_error: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let bootstrap = load_bootstrap_config(args.config.as_deref())
        .context("Failed to load configuration")?;

    // Initialize tracing
    let level = bootstrap.toml.logging.level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting augmentor v{}", env!("CARGO_PKG_VERSION"));
    match &bootstrap.source {
        ConfigSource::Explicit(path) => info!("Config: {}", path.display()),
        ConfigSource::PlatformDefault(path) => info!("Config: {} (platform default)", path.display()),
        ConfigSource::CompiledDefaults => warn!("No config file found, using compiled defaults"),
    }

    let overrides = CliOverrides {
        input_dir: args.input_dir,
        output_dir: args.output_dir,
        noise_dir: args.noise_dir,
        seed: args.seed,
        continue_on_error: args.continue_on_error,
    };
    let config = RunnerConfig::from_sources(&overrides, &bootstrap.toml);
    info!("Input: {}", config.input_dir.display());
    info!("Output: {}", config.output_dir.display());
    info!("Background noise: {}", config.background_noise_dir.display());

    let chain = AugmentationChain::standard(&config.background_noise_dir)
        .context("Failed to build augmentation chain")?;

    let mut runner = PipelineRunner::new(config, chain);
    let summary = runner.run().context("Augmentation run failed")?;

    for (name, reason) in &summary.failed {
        warn!("Skipped {}: {}", name, reason);
    }

    Ok(())
}
