//! Ordered augmentation chain

use super::{
    validate_probability, AddBackgroundNoise, AugmentationStep, Gain, PitchShift, TimeStretch,
};
use crate::error::Result;
use augmentor_common::Waveform;
use rand::{Rng, RngCore};
use std::path::Path;
use tracing::debug;

/// Steps applied in declaration order, each consuming the previous output.
///
/// The chain itself fires with probability `p`; each step then applies its
/// own probability.
#[derive(Debug)]
pub struct AugmentationChain {
    steps: Vec<AugmentationStep>,
    p: f64,
}

impl AugmentationChain {
    pub fn new(steps: Vec<AugmentationStep>) -> Self {
        Self { steps, p: 1.0 }
    }

    /// Chain that fires with probability `p` as a whole
    pub fn with_probability(steps: Vec<AugmentationStep>, p: f64) -> Result<Self> {
        validate_probability("AugmentationChain", p)?;
        Ok(Self { steps, p })
    }

    /// The standard chain: noise at 10-20 dB SNR, pitch +0.5..1 semitone,
    /// stretch 1.0..1.25, gain -1..1 dB, all with p = 1.
    pub fn standard(noise_dir: &Path) -> Result<Self> {
        Ok(Self::new(vec![
            AddBackgroundNoise::new(noise_dir, 10.0, 20.0, 1.0)?.into(),
            PitchShift::new(0.5, 1.0, 1.0)?.into(),
            TimeStretch::new(1.0, 1.25, true, 1.0)?.into(),
            Gain::new(-1.0, 1.0, 1.0)?.into(),
        ]))
    }

    pub fn steps(&self) -> &[AugmentationStep] {
        &self.steps
    }

    pub fn probability(&self) -> f64 {
        self.p
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the chain over `waveform`. The sample rate is carried through.
    pub fn apply(&self, waveform: &Waveform, rng: &mut dyn RngCore) -> Result<Waveform> {
        if !fires(self.p, rng) {
            debug!("Chain skipped (p = {})", self.p);
            return Ok(waveform.clone());
        }

        let mut samples = waveform.samples.clone();
        for step in &self.steps {
            if !fires(step.probability(), rng) {
                debug!("{} skipped", step.name());
                continue;
            }
            samples = step
                .transform()
                .apply(&samples, waveform.sample_rate, rng)?;
        }

        Ok(Waveform::new(samples, waveform.sample_rate))
    }
}

fn fires(p: f64, rng: &mut dyn RngCore) -> bool {
    p >= 1.0 || rng.gen::<f64>() < p
}
