//! Audio encoder
//!
//! Writes a mono [`Waveform`] to disk, choosing the container from the output
//! file extension:
//! - `wav`: 16-bit PCM (hound)
//! - `mp3`: LAME at 128 kbps (mp3lame-encoder)
//!
//! Samples outside [-1.0, 1.0] are clipped.

use super::Waveform;
use crate::error::{Error, Result};
use mp3lame_encoder::{Bitrate, Builder, FlushGap, MonoPcm, Quality};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Output container inferred from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Wav,
    Mp3,
}

impl OutputFormat {
    /// Infer the output format from `path`'s extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("wav") => Ok(OutputFormat::Wav),
            Some("mp3") => Ok(OutputFormat::Mp3),
            Some(other) => Err(Error::Encode(format!(
                "Unsupported output format '{}' for {}",
                other,
                path.display()
            ))),
            None => Err(Error::Encode(format!(
                "Cannot infer output format for {} (no extension)",
                path.display()
            ))),
        }
    }
}

/// Whole-file audio encoder.
pub struct AudioEncoder;

impl AudioEncoder {
    /// Encode `waveform` to `path` at the waveform's sample rate.
    ///
    /// Overwrites any existing file.
    pub fn encode_file(path: &Path, waveform: &Waveform) -> Result<()> {
        let format = OutputFormat::from_path(path)?;

        debug!(
            "Encoding {} samples at {}Hz to {} ({:?})",
            waveform.samples.len(),
            waveform.sample_rate,
            path.display(),
            format
        );

        match format {
            OutputFormat::Wav => Self::encode_wav(path, waveform),
            OutputFormat::Mp3 => Self::encode_mp3(path, waveform),
        }
    }

    fn encode_wav(path: &Path, waveform: &Waveform) -> Result<()> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: waveform.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(path, spec)
            .map_err(|e| Error::Encode(format!("Failed to create {}: {}", path.display(), e)))?;

        for &sample in &waveform.samples {
            writer
                .write_sample(to_i16(sample))
                .map_err(|e| Error::Encode(format!("Failed to write {}: {}", path.display(), e)))?;
        }

        writer
            .finalize()
            .map_err(|e| Error::Encode(format!("Failed to finalize {}: {}", path.display(), e)))
    }

    fn encode_mp3(path: &Path, waveform: &Waveform) -> Result<()> {
        let mut builder = Builder::new()
            .ok_or_else(|| Error::Encode("Failed to create LAME encoder".to_string()))?;
        builder
            .set_num_channels(1)
            .map_err(|e| Error::Encode(format!("LAME channel setup failed: {:?}", e)))?;
        builder
            .set_sample_rate(waveform.sample_rate)
            .map_err(|e| Error::Encode(format!("LAME sample rate setup failed: {:?}", e)))?;
        builder
            .set_brate(Bitrate::Kbps128)
            .map_err(|e| Error::Encode(format!("LAME bitrate setup failed: {:?}", e)))?;
        builder
            .set_quality(Quality::Good)
            .map_err(|e| Error::Encode(format!("LAME quality setup failed: {:?}", e)))?;
        let mut encoder = builder
            .build()
            .map_err(|e| Error::Encode(format!("LAME initialization failed: {:?}", e)))?;

        let pcm: Vec<i16> = waveform.samples.iter().map(|&s| to_i16(s)).collect();

        let mut mp3_bytes = Vec::with_capacity(mp3lame_encoder::max_required_buffer_size(pcm.len()));
        encoder
            .encode_to_vec(MonoPcm(&pcm), &mut mp3_bytes)
            .map_err(|e| Error::Encode(format!("MP3 encode failed: {:?}", e)))?;
        // End of a standalone file: drain LAME's buffered PCM too
        encoder
            .flush_to_vec::<FlushGap>(&mut mp3_bytes)
            .map_err(|e| Error::Encode(format!("MP3 flush failed: {:?}", e)))?;

        let file = File::create(path)
            .map_err(|e| Error::Encode(format!("Failed to create {}: {}", path.display(), e)))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&mp3_bytes)
            .and_then(|_| writer.flush())
            .map_err(|e| Error::Encode(format!("Failed to write {}: {}", path.display(), e)))
    }
}

/// Convert a normalized f32 sample to i16 with clipping
fn to_i16(sample: f32) -> i16 {
    (sample * i16::MAX as f32).clamp(i16::MIN as f32, i16::MAX as f32) as i16
}
