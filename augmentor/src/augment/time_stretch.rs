//! Random time stretch without pitch change

use super::stft::{fix_length, time_stretch};
use super::{sample_uniform, validate_probability, validate_range, Transform};
use crate::error::{AugmentError, Result};
use rand::RngCore;
use tracing::debug;

/// Slowest allowed stretch rate
pub const MIN_RATE: f64 = 0.1;

/// Fastest allowed stretch rate
pub const MAX_RATE: f64 = 10.0;

/// Change tempo by a random rate from [min_rate, max_rate].
///
/// A rate above 1.0 speeds the signal up. With `leave_length_unchanged`
/// the result is zero-padded or truncated back to the input length.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeStretch {
    pub min_rate: f64,
    pub max_rate: f64,
    pub leave_length_unchanged: bool,
    pub p: f64,
}

impl TimeStretch {
    pub fn new(min_rate: f64, max_rate: f64, leave_length_unchanged: bool, p: f64) -> Result<Self> {
        validate_range("TimeStretch", "rate", min_rate, max_rate)?;
        validate_probability("TimeStretch", p)?;
        if min_rate < MIN_RATE || max_rate > MAX_RATE {
            return Err(AugmentError::InvalidParameters(format!(
                "TimeStretch: rates must lie in [{}, {}] (got {}..{})",
                MIN_RATE, MAX_RATE, min_rate, max_rate
            )));
        }
        Ok(Self {
            min_rate,
            max_rate,
            leave_length_unchanged,
            p,
        })
    }
}

impl Transform for TimeStretch {
    fn name(&self) -> &str {
        "TimeStretch"
    }

    fn probability(&self) -> f64 {
        self.p
    }

    fn apply(&self, samples: &[f32], _sample_rate: u32, rng: &mut dyn RngCore) -> Result<Vec<f32>> {
        let rate = sample_uniform(rng, self.min_rate, self.max_rate);
        debug!("TimeStretch: rate {:.4}", rate);

        let stretched = time_stretch(samples, rate);
        if self.leave_length_unchanged {
            Ok(fix_length(stretched, samples.len()))
        } else {
            Ok(stretched)
        }
    }
}
