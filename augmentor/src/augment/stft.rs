//! Short-time Fourier transform and phase vocoder
//!
//! Time stretching runs a phase vocoder over an STFT with centered,
//! zero-padded frames and a periodic Hann window, then overlap-adds the
//! stretched frames back with window-sum normalization.

use rustfft::num_complex::Complex32;
use rustfft::num_traits::Zero;
use rustfft::FftPlanner;
use std::f32::consts::PI;
use std::sync::Arc;

/// FFT size used for time stretching
pub const N_FFT: usize = 2048;

/// Hop between frames (75% overlap)
pub const HOP_LENGTH: usize = N_FFT / 4;

/// Periodic Hann window of `size` samples
pub fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f32 / size as f32).cos())
        .collect()
}

/// Forward/inverse STFT with planned FFTs
pub struct Stft {
    n_fft: usize,
    hop_length: usize,
    window: Vec<f32>,
    forward: Arc<dyn rustfft::Fft<f32>>,
    inverse: Arc<dyn rustfft::Fft<f32>>,
}

impl Stft {
    pub fn new(n_fft: usize, hop_length: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            n_fft,
            hop_length,
            window: hann_window(n_fft),
            forward: planner.plan_fft_forward(n_fft),
            inverse: planner.plan_fft_inverse(n_fft),
        }
    }

    /// Number of non-negative frequency bins per frame
    pub fn n_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Analyze `signal` into frames of `n_bins()` complex bins.
    ///
    /// The signal is padded with `n_fft / 2` zeros on both sides so frame `t`
    /// is centered on sample `t * hop_length`.
    pub fn analyze(&self, signal: &[f32]) -> Vec<Vec<Complex32>> {
        let pad = self.n_fft / 2;
        let mut padded = vec![0.0f32; signal.len() + 2 * pad];
        padded[pad..pad + signal.len()].copy_from_slice(signal);

        let n_frames = 1 + (padded.len() - self.n_fft) / self.hop_length;
        let n_bins = self.n_bins();

        (0..n_frames)
            .map(|t| {
                let start = t * self.hop_length;
                let mut buf: Vec<Complex32> = padded[start..start + self.n_fft]
                    .iter()
                    .zip(self.window.iter())
                    .map(|(&x, &w)| Complex32::new(x * w, 0.0))
                    .collect();
                self.forward.process(&mut buf);
                buf.truncate(n_bins);
                buf
            })
            .collect()
    }

    /// Overlap-add `frames` back into a signal of exactly `length` samples.
    pub fn synthesize(&self, frames: &[Vec<Complex32>], length: usize) -> Vec<f32> {
        if frames.is_empty() {
            return vec![0.0; length];
        }

        let n_fft = self.n_fft;
        let n_bins = self.n_bins();
        let total_len = n_fft + self.hop_length * (frames.len() - 1);
        let mut output = vec![0.0f32; total_len];
        let mut window_sum = vec![0.0f32; total_len];
        let scale = 1.0 / n_fft as f32;

        let mut full = vec![Complex32::zero(); n_fft];
        for (t, frame) in frames.iter().enumerate() {
            // Rebuild the Hermitian-symmetric spectrum of a real frame
            full[..n_bins].copy_from_slice(&frame[..n_bins]);
            for k in 1..n_fft - n_bins + 1 {
                full[n_fft - k] = frame[k].conj();
            }
            self.inverse.process(&mut full);

            let start = t * self.hop_length;
            for (i, (&w, x)) in self.window.iter().zip(full.iter()).enumerate() {
                output[start + i] += x.re * scale * w;
                window_sum[start + i] += w * w;
            }
        }

        for (sample, &sum) in output.iter_mut().zip(window_sum.iter()) {
            if sum > f32::MIN_POSITIVE {
                *sample /= sum;
            }
        }

        let mut signal: Vec<f32> = output.into_iter().skip(n_fft / 2).take(length).collect();
        signal.resize(length, 0.0);
        signal
    }
}

/// Stretch an STFT by `rate` (> 1.0 speeds up, < 1.0 slows down).
///
/// Magnitudes are linearly interpolated between neighbouring frames; phases
/// are accumulated from the measured per-bin instantaneous frequency.
pub fn phase_vocoder(frames: &[Vec<Complex32>], rate: f64, hop_length: usize) -> Vec<Vec<Complex32>> {
    if frames.is_empty() {
        return Vec::new();
    }

    let n_frames = frames.len();
    let n_bins = frames[0].len();
    let bin_span = (n_bins.max(2) - 1) as f32;

    // Expected phase advance per hop for each bin center frequency
    let phi_advance: Vec<f32> = (0..n_bins)
        .map(|k| PI * hop_length as f32 * k as f32 / bin_span)
        .collect();

    let mut phase_acc: Vec<f32> = frames[0].iter().map(|c| c.arg()).collect();
    let zero_frame = vec![Complex32::zero(); n_bins];

    let n_out = (n_frames as f64 / rate).ceil() as usize;
    let mut stretched = Vec::with_capacity(n_out);

    for t in 0..n_out {
        let step = t as f64 * rate;
        let idx = step.floor() as usize;
        if idx >= n_frames {
            break;
        }
        let alpha = step.fract() as f32;

        let left = &frames[idx];
        let right = frames.get(idx + 1).unwrap_or(&zero_frame);

        let mut out = Vec::with_capacity(n_bins);
        for k in 0..n_bins {
            let mag = (1.0 - alpha) * left[k].norm() + alpha * right[k].norm();
            out.push(Complex32::from_polar(mag, phase_acc[k]));

            let mut dphase = right[k].arg() - left[k].arg() - phi_advance[k];
            dphase -= 2.0 * PI * (dphase / (2.0 * PI)).round();
            phase_acc[k] += phi_advance[k] + dphase;
        }
        stretched.push(out);
    }

    stretched
}

/// Time-stretch `samples` by `rate` without changing pitch.
///
/// Output length is `round(samples.len() / rate)`.
pub fn time_stretch(samples: &[f32], rate: f64) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let stft = Stft::new(N_FFT, HOP_LENGTH);
    let frames = stft.analyze(samples);
    let stretched = phase_vocoder(&frames, rate, HOP_LENGTH);
    let length = (samples.len() as f64 / rate).round() as usize;
    stft.synthesize(&stretched, length)
}

/// Zero-pad or truncate `samples` to exactly `length`
pub fn fix_length(mut samples: Vec<f32>, length: usize) -> Vec<f32> {
    samples.resize(length, 0.0);
    samples
}
