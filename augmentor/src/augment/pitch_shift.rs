//! Random pitch shift without tempo change
//!
//! The signal is time-stretched by `2^(-semitones/12)` and then resampled by
//! the same ratio, which restores the duration and moves the pitch.

use super::stft::{fix_length, time_stretch};
use super::{sample_uniform, validate_probability, validate_range, Transform};
use crate::error::{AugmentError, Result};
use augmentor_common::audio::Resampler;
use rand::RngCore;
use tracing::debug;

/// Largest shift in either direction, in semitones
pub const MAX_SEMITONES: f64 = 24.0;

/// Shift pitch by a random number of semitones from [min_semitones, max_semitones]
#[derive(Debug, Clone, PartialEq)]
pub struct PitchShift {
    pub min_semitones: f64,
    pub max_semitones: f64,
    pub p: f64,
}

impl PitchShift {
    pub fn new(min_semitones: f64, max_semitones: f64, p: f64) -> Result<Self> {
        validate_range("PitchShift", "semitones", min_semitones, max_semitones)?;
        validate_probability("PitchShift", p)?;
        if min_semitones < -MAX_SEMITONES || max_semitones > MAX_SEMITONES {
            return Err(AugmentError::InvalidParameters(format!(
                "PitchShift: semitones must lie in [-{}, {}] (got {}..{})",
                MAX_SEMITONES, MAX_SEMITONES, min_semitones, max_semitones
            )));
        }
        Ok(Self {
            min_semitones,
            max_semitones,
            p,
        })
    }
}

/// Shift `samples` by `semitones`, keeping the input length
pub fn shift_pitch(samples: &[f32], semitones: f64) -> Result<Vec<f32>> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let rate = 2f64.powf(-semitones / 12.0);
    let stretched = time_stretch(samples, rate);
    let shifted =
        Resampler::resample_by_ratio(&stretched, rate).map_err(|e| AugmentError::Transform {
            name: "PitchShift".to_string(),
            reason: e.to_string(),
        })?;

    Ok(fix_length(shifted, samples.len()))
}

impl Transform for PitchShift {
    fn name(&self) -> &str {
        "PitchShift"
    }

    fn probability(&self) -> f64 {
        self.p
    }

    fn apply(&self, samples: &[f32], _sample_rate: u32, rng: &mut dyn RngCore) -> Result<Vec<f32>> {
        let semitones = sample_uniform(rng, self.min_semitones, self.max_semitones);
        debug!("PitchShift: {:.3} semitones", semitones);

        shift_pitch(samples, semitones)
    }
}
