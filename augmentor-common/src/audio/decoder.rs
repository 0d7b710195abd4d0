//! Audio decoder using symphonia
//!
//! Decodes MP3, WAV, FLAC, Vorbis and AAC files to a mono [`Waveform`] at the
//! file's native sample rate. No resampling happens here.

use super::Waveform;
use crate::error::{Error, Result};
use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use tracing::{debug, warn};

/// Whole-file audio decoder.
pub struct AudioDecoder;

impl AudioDecoder {
    /// Decode an entire audio file to a mono waveform.
    ///
    /// Multi-channel sources are averaged down to one channel. The returned
    /// sample rate is the source's native rate.
    ///
    /// # Errors
    /// [`Error::Decode`] when the file cannot be opened, probed or decoded,
    /// or when it contains no audio samples.
    pub fn decode_file(path: &Path) -> Result<Waveform> {
        debug!("Decoding entire file: {}", path.display());

        let file = std::fs::File::open(path)
            .map_err(|e| Error::Decode(format!("Failed to open file {}: {}", path.display(), e)))?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Extension hint helps the probe pick a format reader
        let mut hint = Hint::new();
        if let Some(ext_str) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext_str);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| {
                Error::Decode(format!("Failed to probe format of {}: {}", path.display(), e))
            })?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| Error::Decode(format!("No audio track found in {}", path.display())))?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| Error::Decode("Sample rate not found".to_string()))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| Error::Decode(format!("Failed to create decoder: {}", e)))?;

        let mut samples = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    debug!("Reached end of file");
                    break;
                }
                Err(symphonia::core::errors::Error::ResetRequired) => break,
                Err(e) => {
                    return Err(Error::Decode(format!(
                        "Error reading packet from {}: {}",
                        path.display(),
                        e
                    )))
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => downmix_into(&decoded, &mut samples),
                // Corrupt frames are skipped, the rest of the stream is still usable
                Err(symphonia::core::errors::Error::DecodeError(e)) => {
                    warn!("Skipping undecodable packet in {}: {}", path.display(), e);
                }
                Err(e) => {
                    return Err(Error::Decode(format!(
                        "Decode failed for {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        }

        if samples.is_empty() {
            return Err(Error::Decode(format!(
                "No audio samples decoded from {}",
                path.display()
            )));
        }

        debug!(
            "Decoded {} mono samples at {}Hz from {}",
            samples.len(),
            sample_rate,
            path.display()
        );

        Ok(Waveform::new(samples, sample_rate))
    }
}

/// Append a decoded buffer to `output` as mono f32.
fn downmix_into(decoded: &AudioBufferRef, output: &mut Vec<f32>) {
    match decoded {
        AudioBufferRef::F32(buf) => downmix_planar(buf, output),
        AudioBufferRef::F64(buf) => downmix_planar(buf, output),
        AudioBufferRef::S32(buf) => downmix_planar(buf, output),
        AudioBufferRef::S24(buf) => downmix_planar(buf, output),
        AudioBufferRef::S16(buf) => downmix_planar(buf, output),
        AudioBufferRef::S8(buf) => downmix_planar(buf, output),
        AudioBufferRef::U32(buf) => downmix_planar(buf, output),
        AudioBufferRef::U24(buf) => downmix_planar(buf, output),
        AudioBufferRef::U16(buf) => downmix_planar(buf, output),
        AudioBufferRef::U8(buf) => downmix_planar(buf, output),
    }
}

/// Average all channels of a planar buffer into one f32 channel.
///
/// Sample conversion normalizes every format to [-1.0, 1.0].
fn downmix_planar<S>(buf: &AudioBuffer<S>, output: &mut Vec<f32>)
where
    S: Sample,
    f32: FromSample<S>,
{
    let num_channels = buf.spec().channels.count();
    let num_frames = buf.frames();
    if num_channels == 0 {
        return;
    }

    output.reserve(num_frames);
    let scale = 1.0 / num_channels as f32;

    for frame_idx in 0..num_frames {
        let sum: f32 = (0..num_channels)
            .map(|ch_idx| f32::from_sample(buf.chan(ch_idx)[frame_idx]))
            .sum();
        output.push(sum * scale);
    }
}
