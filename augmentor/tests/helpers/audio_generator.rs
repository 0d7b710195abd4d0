//! Test audio file generation
//!
//! Writes short sine and noise recordings with known characteristics into
//! test directories.

use augmentor_common::audio::AudioEncoder;
use augmentor_common::Waveform;
use hound::{WavSpec, WavWriter};
use std::f32::consts::PI;
use std::path::Path;

/// Mono sine samples
pub fn sine_samples(sample_rate: u32, duration_ms: u64, frequency_hz: f32, amplitude: f32) -> Vec<f32> {
    let frames = (sample_rate as u64 * duration_ms / 1000) as usize;
    (0..frames)
        .map(|i| (2.0 * PI * frequency_hz * i as f32 / sample_rate as f32).sin() * amplitude)
        .collect()
}

/// Generate a mono 16-bit sine WAV file
pub fn generate_sine_wav<P: AsRef<Path>>(
    path: P,
    sample_rate: u32,
    duration_ms: u64,
    frequency_hz: f32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for sample in sine_samples(sample_rate, duration_ms, frequency_hz, 0.5) {
        writer.write_sample((sample * i16::MAX as f32) as i16)?;
    }
    writer.finalize()
}

/// Generate a mono sine MP3 file with the crate's own encoder
pub fn generate_sine_mp3<P: AsRef<Path>>(
    path: P,
    sample_rate: u32,
    duration_ms: u64,
    frequency_hz: f32,
) -> augmentor_common::Result<()> {
    let waveform = Waveform::new(
        sine_samples(sample_rate, duration_ms, frequency_hz, 0.5),
        sample_rate,
    );
    AudioEncoder::encode_file(path.as_ref(), &waveform)
}

/// Generate a deterministic pseudo-random noise WAV file
pub fn generate_noise_wav<P: AsRef<Path>>(
    path: P,
    sample_rate: u32,
    duration_ms: u64,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    let frames = sample_rate as u64 * duration_ms / 1000;

    // xorshift keeps fixtures identical across runs
    let mut state: u32 = 0x9E37_79B9;
    for _ in 0..frames {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let value = (state >> 16) as i16 / 4;
        writer.write_sample(value)?;
    }
    writer.finalize()
}
