//! Audio IO: in-memory waveform, decode, encode, resample

pub mod decoder;
pub mod encoder;
pub mod resampler;

pub use decoder::AudioDecoder;
pub use encoder::{AudioEncoder, OutputFormat};
pub use resampler::Resampler;

/// Decoded mono audio plus its sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Normalized samples in [-1.0, 1.0] (may exceed after augmentation)
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Root-mean-square level of the whole waveform
    pub fn rms(&self) -> f32 {
        rms(&self.samples)
    }
}

/// Root-mean-square of a sample slice (0.0 for an empty slice)
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_constant_signal() {
        assert!((rms(&[0.5, -0.5, 0.5, -0.5]) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_rms_empty() {
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_waveform_duration() {
        let waveform = Waveform::new(vec![0.0; 22050], 44100);
        assert!((waveform.duration_secs() - 0.5).abs() < 1e-9);
        assert_eq!(waveform.len(), 22050);
        assert!(!waveform.is_empty());
    }
}
