//! Background noise mixing at a random signal-to-noise ratio

use super::{sample_uniform, validate_probability, validate_range, Transform};
use crate::error::{AugmentError, Result};
use augmentor_common::audio::{rms, AudioDecoder, Resampler};
use rand::{Rng, RngCore};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions recognised as noise recordings
pub const NOISE_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg", "m4a", "aac"];

/// RMS below which a signal counts as silent
const SILENCE_RMS: f32 = 1e-9;

/// Mix a randomly chosen noise recording into the signal.
///
/// The noise is scaled so that `rms(signal) / rms(noise) = 10^(snr_db / 20)`
/// with `snr_db` drawn from [min_snr_db, max_snr_db]. Each noise file is
/// decoded once per target sample rate and kept for later inputs.
#[derive(Debug, Clone)]
pub struct AddBackgroundNoise {
    sounds_path: PathBuf,
    sound_files: Vec<PathBuf>,
    cache: RefCell<HashMap<(PathBuf, u32), Rc<Vec<f32>>>>,
    pub min_snr_db: f64,
    pub max_snr_db: f64,
    pub p: f64,
}

impl AddBackgroundNoise {
    /// Discover noise recordings under `sounds_path` (recursively).
    ///
    /// Fails when the directory is missing or holds no recognised audio.
    pub fn new(sounds_path: impl Into<PathBuf>, min_snr_db: f64, max_snr_db: f64, p: f64) -> Result<Self> {
        validate_range("AddBackgroundNoise", "snr_db", min_snr_db, max_snr_db)?;
        validate_probability("AddBackgroundNoise", p)?;

        let sounds_path = sounds_path.into();
        let sound_files = find_sound_files(&sounds_path)?;
        if sound_files.is_empty() {
            return Err(AugmentError::InvalidParameters(format!(
                "AddBackgroundNoise: no audio files found in {}",
                sounds_path.display()
            )));
        }

        debug!(
            "AddBackgroundNoise: {} noise files in {}",
            sound_files.len(),
            sounds_path.display()
        );

        Ok(Self {
            sounds_path,
            sound_files,
            cache: RefCell::new(HashMap::new()),
            min_snr_db,
            max_snr_db,
            p,
        })
    }

    pub fn sounds_path(&self) -> &Path {
        &self.sounds_path
    }

    /// Discovered noise files, sorted by path
    pub fn sound_files(&self) -> &[PathBuf] {
        &self.sound_files
    }

    /// Noise samples of `path` at `sample_rate`, decoding on first use.
    ///
    /// Failures name the noise file so they are not mistaken for a problem
    /// with the input being augmented.
    fn load_noise(&self, path: &Path, sample_rate: u32) -> Result<Rc<Vec<f32>>> {
        let key = (path.to_path_buf(), sample_rate);
        if let Some(noise) = self.cache.borrow().get(&key) {
            return Ok(Rc::clone(noise));
        }

        let noise_error = |e: augmentor_common::Error| AugmentError::Transform {
            name: "AddBackgroundNoise".to_string(),
            reason: format!("noise file {}: {}", path.display(), e),
        };
        let decoded = AudioDecoder::decode_file(path).map_err(noise_error)?;
        let resampled = Resampler::resample(&decoded.samples, decoded.sample_rate, sample_rate)
            .map_err(noise_error)?;
        debug!(
            "AddBackgroundNoise: loaded {} ({} samples at {}Hz)",
            path.display(),
            resampled.len(),
            sample_rate
        );

        let noise = Rc::new(resampled);
        self.cache.borrow_mut().insert(key, Rc::clone(&noise));
        Ok(noise)
    }
}

fn find_sound_files(root: &Path) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(root).map_err(|e| AugmentError::filesystem(root, e))?;
    if !metadata.is_dir() {
        return Err(AugmentError::filesystem(
            root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && has_noise_extension(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
            Err(e) => warn!("Error accessing noise entry: {}", e),
        }
    }
    files.sort();
    Ok(files)
}

fn has_noise_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| NOISE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Bring `noise` to exactly `length` samples.
///
/// Shorter noise is repeated; longer noise contributes a window starting at a
/// random offset.
pub fn fit_noise_length(noise: &[f32], length: usize, rng: &mut dyn RngCore) -> Vec<f32> {
    if noise.is_empty() {
        return vec![0.0; length];
    }

    if noise.len() <= length {
        return noise.iter().copied().cycle().take(length).collect();
    }

    let offset = rng.gen_range(0..=noise.len() - length);
    noise[offset..offset + length].to_vec()
}

impl Transform for AddBackgroundNoise {
    fn name(&self) -> &str {
        "AddBackgroundNoise"
    }

    fn probability(&self) -> f64 {
        self.p
    }

    fn apply(&self, samples: &[f32], sample_rate: u32, rng: &mut dyn RngCore) -> Result<Vec<f32>> {
        let signal_rms = rms(samples);
        if signal_rms < SILENCE_RMS {
            warn!("AddBackgroundNoise: input is silent, leaving it unchanged");
            return Ok(samples.to_vec());
        }

        let path = &self.sound_files[rng.gen_range(0..self.sound_files.len())];
        let noise = self.load_noise(path, sample_rate)?;
        let noise = fit_noise_length(&noise, samples.len(), rng);

        let noise_rms = rms(&noise);
        if noise_rms < SILENCE_RMS {
            warn!(
                "AddBackgroundNoise: {} is silent, leaving signal unchanged",
                path.display()
            );
            return Ok(samples.to_vec());
        }

        let snr_db = sample_uniform(rng, self.min_snr_db, self.max_snr_db);
        let target_rms = signal_rms as f64 / 10f64.powf(snr_db / 20.0);
        let scale = (target_rms / noise_rms as f64) as f32;
        debug!(
            "AddBackgroundNoise: {} at {:.2} dB SNR (scale {:.5})",
            path.display(),
            snr_db,
            scale
        );

        Ok(samples
            .iter()
            .zip(noise.iter())
            .map(|(&s, &n)| s + n * scale)
            .collect())
    }
}
