//! Audio resampling using rubato
//!
//! Used to bring background noise to the signal's rate and by pitch shifting,
//! which resamples by a non-integer ratio after time stretching.

use crate::error::{Error, Result};
use rubato::{FastFixedIn, PolynomialDegree, Resampler as RubatoResampler};
use tracing::debug;

/// Audio resampler using rubato for sample rate conversion.
pub struct Resampler;

impl Resampler {
    /// Resample mono audio from `input_rate` to `output_rate`.
    ///
    /// Returns a copy without resampling when the rates already match.
    pub fn resample(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
        if input_rate == 0 || output_rate == 0 {
            return Err(Error::InvalidInput(format!(
                "Sample rates must be positive (got {} -> {})",
                input_rate, output_rate
            )));
        }

        if input_rate == output_rate {
            debug!("Sample rate already at {}Hz, skipping resample", output_rate);
            return Ok(input.to_vec());
        }

        debug!("Resampling from {}Hz to {}Hz", input_rate, output_rate);
        Self::resample_by_ratio(input, output_rate as f64 / input_rate as f64)
    }

    /// Resample mono audio by `ratio` (output rate / input rate).
    ///
    /// Output length is approximately `input.len() * ratio`.
    pub fn resample_by_ratio(input: &[f32], ratio: f64) -> Result<Vec<f32>> {
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(Error::InvalidInput(format!("Invalid resample ratio: {}", ratio)));
        }

        if input.is_empty() {
            return Ok(Vec::new());
        }

        // Whole signal in one chunk
        let input_frames = input.len();
        let mut resampler = Self::create_resampler(ratio, input_frames)?;

        let planar_output = resampler
            .process(&[input], None)
            .map_err(|e| Error::InvalidInput(format!("Resampling failed: {}", e)))?;

        let output = planar_output.into_iter().next().unwrap_or_default();

        debug!(
            "Resampled {} input frames to {} output frames (ratio {:.4})",
            input_frames,
            output.len(),
            ratio
        );

        Ok(output)
    }

    /// Create a mono rubato resampler.
    ///
    /// FastFixedIn with a septic polynomial gives good quality at low cost.
    fn create_resampler(ratio: f64, chunk_size: usize) -> Result<FastFixedIn<f32>> {
        FastFixedIn::<f32>::new(
            ratio,
            1.0, // no runtime ratio changes
            PolynomialDegree::Septic,
            chunk_size,
            1,
        )
        .map_err(|e| Error::InvalidInput(format!("Failed to create resampler: {}", e)))
    }
}
