//! Augmentation transforms and the chain that composes them
//!
//! Every transform implements [`Transform`]. The known kinds are wrapped in
//! [`AugmentationStep`] so metadata can describe each one with its typed
//! parameters; anything else travels as [`AugmentationStep::Other`].

pub mod chain;
pub mod gain;
pub mod noise;
pub mod pitch_shift;
pub mod stft;
pub mod time_stretch;

pub use chain::AugmentationChain;
pub use gain::Gain;
pub use noise::AddBackgroundNoise;
pub use pitch_shift::PitchShift;
pub use time_stretch::TimeStretch;

use crate::error::{AugmentError, Result};
use rand::{Rng, RngCore};

/// A signal transform with an application probability.
///
/// `apply` always transforms; the chain decides beforehand whether the step
/// fires, using `probability()`.
pub trait Transform {
    /// Step kind name written to metadata
    fn name(&self) -> &str;

    /// Probability in [0, 1] that the step fires on a given input
    fn probability(&self) -> f64;

    /// Transform `samples` recorded at `sample_rate`, drawing any random
    /// parameters from `rng`.
    fn apply(&self, samples: &[f32], sample_rate: u32, rng: &mut dyn RngCore) -> Result<Vec<f32>>;
}

/// One configured step of the chain
pub enum AugmentationStep {
    AddBackgroundNoise(AddBackgroundNoise),
    PitchShift(PitchShift),
    TimeStretch(TimeStretch),
    Gain(Gain),
    /// Transform of a kind the metadata layer does not know
    Other(Box<dyn Transform>),
}

impl AugmentationStep {
    /// The underlying transform
    pub fn transform(&self) -> &dyn Transform {
        match self {
            AugmentationStep::AddBackgroundNoise(t) => t,
            AugmentationStep::PitchShift(t) => t,
            AugmentationStep::TimeStretch(t) => t,
            AugmentationStep::Gain(t) => t,
            AugmentationStep::Other(t) => t.as_ref(),
        }
    }

    pub fn name(&self) -> &str {
        self.transform().name()
    }

    pub fn probability(&self) -> f64 {
        self.transform().probability()
    }
}

impl std::fmt::Debug for AugmentationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AugmentationStep")
            .field("name", &self.name())
            .field("p", &self.probability())
            .finish()
    }
}

impl From<AddBackgroundNoise> for AugmentationStep {
    fn from(t: AddBackgroundNoise) -> Self {
        AugmentationStep::AddBackgroundNoise(t)
    }
}

impl From<PitchShift> for AugmentationStep {
    fn from(t: PitchShift) -> Self {
        AugmentationStep::PitchShift(t)
    }
}

impl From<TimeStretch> for AugmentationStep {
    fn from(t: TimeStretch) -> Self {
        AugmentationStep::TimeStretch(t)
    }
}

impl From<Gain> for AugmentationStep {
    fn from(t: Gain) -> Self {
        AugmentationStep::Gain(t)
    }
}

/// Draw uniformly from [low, high]; degenerate ranges return `low`
pub(crate) fn sample_uniform(rng: &mut dyn RngCore, low: f64, high: f64) -> f64 {
    if low >= high {
        low
    } else {
        rng.gen_range(low..=high)
    }
}

/// Reject probabilities outside [0, 1]
pub(crate) fn validate_probability(step: &str, p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(AugmentError::InvalidParameters(format!(
            "{}: probability {} outside [0, 1]",
            step, p
        )));
    }
    Ok(())
}

/// Reject non-finite bounds and `min > max`
pub(crate) fn validate_range(step: &str, param: &str, min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(AugmentError::InvalidParameters(format!(
            "{}: {} bounds must be finite (got {}..{})",
            step, param, min, max
        )));
    }
    if min > max {
        return Err(AugmentError::InvalidParameters(format!(
            "{}: min_{} ({}) is greater than max_{} ({})",
            step, param, min, param, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_uniform_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let v = sample_uniform(&mut rng, -1.0, 1.0);
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_sample_uniform_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample_uniform(&mut rng, 0.5, 0.5), 0.5);
    }

    #[test]
    fn test_validate_probability() {
        assert!(validate_probability("Gain", 0.0).is_ok());
        assert!(validate_probability("Gain", 1.0).is_ok());
        assert!(validate_probability("Gain", 1.5).is_err());
        assert!(validate_probability("Gain", -0.1).is_err());
        assert!(validate_probability("Gain", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("Gain", "gain_db", -1.0, 1.0).is_ok());
        assert!(validate_range("Gain", "gain_db", 1.0, 1.0).is_ok());
        assert!(matches!(
            validate_range("Gain", "gain_db", 2.0, 1.0),
            Err(AugmentError::InvalidParameters(_))
        ));
        assert!(validate_range("Gain", "gain_db", f64::NEG_INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_step_name_and_probability() {
        let step: AugmentationStep = Gain::new(-1.0, 1.0, 0.5).unwrap().into();
        assert_eq!(step.name(), "Gain");
        assert_eq!(step.probability(), 0.5);
    }
}
