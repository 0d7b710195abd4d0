//! Random gain in decibels

use super::{sample_uniform, validate_probability, validate_range, Transform};
use crate::error::Result;
use rand::RngCore;
use tracing::debug;

/// Multiply the signal by a random gain drawn from [min_gain_db, max_gain_db]
#[derive(Debug, Clone, PartialEq)]
pub struct Gain {
    pub min_gain_db: f64,
    pub max_gain_db: f64,
    pub p: f64,
}

impl Gain {
    pub fn new(min_gain_db: f64, max_gain_db: f64, p: f64) -> Result<Self> {
        validate_range("Gain", "gain_db", min_gain_db, max_gain_db)?;
        validate_probability("Gain", p)?;
        Ok(Self {
            min_gain_db,
            max_gain_db,
            p,
        })
    }
}

/// Linear amplitude factor for a gain in dB
pub fn db_to_amplitude(gain_db: f64) -> f32 {
    10f64.powf(gain_db / 20.0) as f32
}

impl Transform for Gain {
    fn name(&self) -> &str {
        "Gain"
    }

    fn probability(&self) -> f64 {
        self.p
    }

    fn apply(&self, samples: &[f32], _sample_rate: u32, rng: &mut dyn RngCore) -> Result<Vec<f32>> {
        let gain_db = sample_uniform(rng, self.min_gain_db, self.max_gain_db);
        let factor = db_to_amplitude(gain_db);
        debug!("Gain: {:.3} dB (x{:.4})", gain_db, factor);

        Ok(samples.iter().map(|&s| s * factor).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_db_to_amplitude() {
        assert!((db_to_amplitude(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_amplitude(20.0) - 10.0).abs() < 1e-5);
        assert!((db_to_amplitude(-6.0) - 0.501_187).abs() < 1e-5);
    }

    #[test]
    fn test_fixed_gain_scales_signal() {
        let gain = Gain::new(6.0, 6.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let output = gain.apply(&[0.1, -0.2, 0.0], 44100, &mut rng).unwrap();

        let factor = db_to_amplitude(6.0);
        assert_eq!(output, vec![0.1 * factor, -0.2 * factor, 0.0]);
    }

    #[test]
    fn test_random_gain_within_bounds() {
        let gain = Gain::new(-1.0, 1.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let output = gain.apply(&[0.5], 44100, &mut rng).unwrap();
            let ratio = output[0] / 0.5;
            assert!(ratio >= db_to_amplitude(-1.0) - 1e-6 && ratio <= db_to_amplitude(1.0) + 1e-6);
        }
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert!(Gain::new(1.0, -1.0, 1.0).is_err());
    }
}
