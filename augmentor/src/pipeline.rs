//! Batch runner: enumerate, decode, augment, encode, describe
//!
//! Files are processed one at a time in file-name order. A single RNG owned
//! by the runner drives every probability gate and parameter draw.

use crate::augment::AugmentationChain;
use crate::config::{ErrorPolicy, RunnerConfig};
use crate::error::{AugmentError, Result};
use crate::metadata::{write_metadata, MetadataRecord};
use augmentor_common::audio::{AudioDecoder, AudioEncoder};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// File names that produced audio and metadata
    pub processed: Vec<String>,
    /// Directory entries ignored (wrong extension or not a regular file)
    pub skipped: usize,
    /// File names that failed under [`ErrorPolicy::Skip`], with the reason
    pub failed: Vec<(String, String)>,
}

/// Applies one chain to every matching file of the input directory
pub struct PipelineRunner {
    config: RunnerConfig,
    chain: AugmentationChain,
    rng: StdRng,
}

impl PipelineRunner {
    pub fn new(config: RunnerConfig, chain: AugmentationChain) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, chain, rng }
    }

    /// Regular files in the input directory ending in `.<extension>`, sorted.
    ///
    /// Also returns how many entries were ignored.
    pub fn enumerate_inputs(&self) -> Result<(Vec<PathBuf>, usize)> {
        let dir = &self.config.input_dir;
        let entries = std::fs::read_dir(dir).map_err(|e| AugmentError::filesystem(dir, e))?;
        let suffix = format!(".{}", self.config.extension);

        let mut inputs = Vec::new();
        let mut skipped = 0;
        for entry in entries {
            let entry = entry.map_err(|e| AugmentError::filesystem(dir, e))?;
            let path = entry.path();
            let is_file = entry
                .file_type()
                .map_err(|e| AugmentError::filesystem(&path, e))?
                .is_file();
            let matches = entry
                .file_name()
                .to_str()
                .map(|name| name.ends_with(&suffix))
                .unwrap_or(false);

            if is_file && matches {
                inputs.push(path);
            } else {
                debug!("Skipping {}", path.display());
                skipped += 1;
            }
        }

        inputs.sort();
        Ok((inputs, skipped))
    }

    /// Augment one input file and write its audio and metadata.
    ///
    /// Returns the output audio path.
    pub fn process_file(&mut self, input: &Path) -> Result<PathBuf> {
        let file_name = input
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                AugmentError::filesystem(
                    input,
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "file name is not UTF-8"),
                )
            })?;

        let waveform = AudioDecoder::decode_file(input)?;
        debug!(
            "Decoded {}: {} samples at {}Hz ({:.2}s, rms {:.4})",
            file_name,
            waveform.len(),
            waveform.sample_rate,
            waveform.duration_secs(),
            waveform.rms()
        );

        let augmented = self.chain.apply(&waveform, &mut self.rng)?;

        let output_dir = &self.config.output_dir;
        std::fs::create_dir_all(output_dir).map_err(|e| AugmentError::filesystem(output_dir, e))?;

        let output_path = output_dir.join(&file_name);
        AudioEncoder::encode_file(&output_path, &augmented)?;

        let record = MetadataRecord::from_chain(&file_name, augmented.sample_rate, &self.chain);
        write_metadata(output_dir, &self.config.extension, &record)?;

        Ok(output_path)
    }

    /// Process every matching input according to the configured error policy
    pub fn run(&mut self) -> Result<RunSummary> {
        info!(
            "Augmenting *.{} in {} into {} ({} steps)",
            self.config.extension,
            self.config.input_dir.display(),
            self.config.output_dir.display(),
            self.chain.len()
        );

        let (inputs, skipped) = self.enumerate_inputs()?;
        let mut summary = RunSummary {
            skipped,
            ..Default::default()
        };

        for input in inputs {
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            match self.process_file(&input) {
                Ok(output) => {
                    info!("Augmented {} -> {}", name, output.display());
                    summary.processed.push(name);
                }
                Err(e) => match self.config.error_policy {
                    ErrorPolicy::Abort => return Err(e),
                    ErrorPolicy::Skip => {
                        warn!("Failed to augment {}: {}", name, e);
                        summary.failed.push((name, e.to_string()));
                    }
                },
            }
        }

        info!(
            "Run complete: {} processed, {} skipped, {} failed",
            summary.processed.len(),
            summary.skipped,
            summary.failed.len()
        );
        Ok(summary)
    }
}
