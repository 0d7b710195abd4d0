//! Metadata sidecars describing the chain applied to each output
//!
//! A record lists every configured step with its parameter bounds, whether or
//! not the step fired for that file. Records are written as 4-space indented
//! JSON next to the augmented audio.

use crate::augment::{AugmentationChain, AugmentationStep};
use crate::error::{AugmentError, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ordered parameter name/value pairs.
///
/// Values without a fractional part serialize as JSON integers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet(Vec<(&'static str, f64)>);

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: f64) -> Self {
        self.0.push((key, value));
        self
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            if is_integral(*value) {
                map.serialize_entry(key, &(*value as i64))?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64
}

/// One chain step as written to the sidecar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentationInfo {
    pub name: String,
    pub parameters: ParameterSet,
}

/// Sidecar record for one augmented file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    pub file_name: String,
    pub sample_rate: u32,
    pub augmentations: Vec<AugmentationInfo>,
}

impl MetadataRecord {
    /// Describe every step of `chain` for `file_name`
    pub fn from_chain(file_name: impl Into<String>, sample_rate: u32, chain: &AugmentationChain) -> Self {
        Self {
            file_name: file_name.into(),
            sample_rate,
            augmentations: chain
                .steps()
                .iter()
                .map(|step| AugmentationInfo {
                    name: step.name().to_string(),
                    parameters: describe_step(step),
                })
                .collect(),
        }
    }

    /// 4-space indented JSON
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|e| {
            AugmentError::InvalidParameters(format!("Metadata is not valid UTF-8: {}", e))
        })
    }
}

/// Parameter record for a step.
///
/// The noise step reports its SNR bounds under `min_amplitude` and
/// `max_amplitude`; existing sidecar consumers read those names.
pub fn describe_step(step: &AugmentationStep) -> ParameterSet {
    match step {
        AugmentationStep::AddBackgroundNoise(t) => ParameterSet::new()
            .with("min_amplitude", t.min_snr_db)
            .with("max_amplitude", t.max_snr_db),
        AugmentationStep::PitchShift(t) => ParameterSet::new()
            .with("min_semitones", t.min_semitones)
            .with("max_semitones", t.max_semitones),
        AugmentationStep::TimeStretch(t) => ParameterSet::new()
            .with("min_rate", t.min_rate)
            .with("max_rate", t.max_rate),
        AugmentationStep::Gain(t) => ParameterSet::new()
            .with("min_gain_in_db", t.min_gain_db)
            .with("max_gain_in_db", t.max_gain_db),
        AugmentationStep::Other(_) => ParameterSet::new(),
    }
}

/// Sidecar name for an audio file: `song.mp3` → `song.json`.
///
/// Only a trailing `.<extension>` is replaced; a name without it gets
/// `.json` appended.
pub fn metadata_file_name(file_name: &str, extension: &str) -> String {
    let suffix = format!(".{}", extension);
    match file_name.strip_suffix(&suffix) {
        Some(stem) => format!("{}.json", stem),
        None => format!("{}.json", file_name),
    }
}

/// Write `record` into `dir`, overwriting any existing sidecar.
///
/// Returns the written path.
pub fn write_metadata(dir: &Path, extension: &str, record: &MetadataRecord) -> Result<PathBuf> {
    let path = dir.join(metadata_file_name(&record.file_name, extension));
    let json = record.to_pretty_json()?;
    std::fs::write(&path, json).map_err(|e| AugmentError::filesystem(&path, e))?;
    debug!("Wrote metadata {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augment::{Gain, PitchShift, TimeStretch, Transform};
    use rand::RngCore;
    use serde_json::json;

    struct Reverse;

    impl Transform for Reverse {
        fn name(&self) -> &str {
            "Reverse"
        }

        fn probability(&self) -> f64 {
            1.0
        }

        fn apply(&self, samples: &[f32], _sample_rate: u32, _rng: &mut dyn RngCore) -> Result<Vec<f32>> {
            Ok(samples.iter().rev().copied().collect())
        }
    }

    fn to_value<T: Serialize>(value: &T) -> serde_json::Value {
        serde_json::to_value(value).unwrap()
    }

    #[test]
    fn test_pitch_shift_parameters() {
        let step: AugmentationStep = PitchShift::new(0.5, 1.0, 1.0).unwrap().into();
        assert_eq!(
            to_value(&describe_step(&step)),
            json!({"min_semitones": 0.5, "max_semitones": 1})
        );
    }

    #[test]
    fn test_gain_parameters_are_integers() {
        let step: AugmentationStep = Gain::new(-1.0, 1.0, 1.0).unwrap().into();
        assert_eq!(
            serde_json::to_string(&describe_step(&step)).unwrap(),
            r#"{"min_gain_in_db":-1,"max_gain_in_db":1}"#
        );
    }

    #[test]
    fn test_time_stretch_parameters() {
        let step: AugmentationStep = TimeStretch::new(1.0, 1.25, true, 1.0).unwrap().into();
        assert_eq!(
            serde_json::to_string(&describe_step(&step)).unwrap(),
            r#"{"min_rate":1,"max_rate":1.25}"#
        );
    }

    #[test]
    fn test_unknown_step_has_empty_parameters() {
        let step = AugmentationStep::Other(Box::new(Reverse));
        assert_eq!(describe_step(&step), ParameterSet::new());
        assert_eq!(to_value(&describe_step(&step)), json!({}));
    }

    #[test]
    fn test_record_lists_every_step() {
        let chain = AugmentationChain::new(vec![
            Gain::new(-1.0, 1.0, 0.0).unwrap().into(),
            AugmentationStep::Other(Box::new(Reverse)),
        ]);

        let record = MetadataRecord::from_chain("a.mp3", 44100, &chain);

        assert_eq!(
            to_value(&record),
            json!({
                "file_name": "a.mp3",
                "sample_rate": 44100,
                "augmentations": [
                    {"name": "Gain", "parameters": {"min_gain_in_db": -1, "max_gain_in_db": 1}},
                    {"name": "Reverse", "parameters": {}}
                ]
            })
        );
    }

    #[test]
    fn test_pretty_json_uses_four_space_indent() {
        let record = MetadataRecord {
            file_name: "a.mp3".to_string(),
            sample_rate: 16000,
            augmentations: Vec::new(),
        };

        let json = record.to_pretty_json().unwrap();

        assert_eq!(
            json,
            "{\n    \"file_name\": \"a.mp3\",\n    \"sample_rate\": 16000,\n    \"augmentations\": []\n}"
        );
    }

    #[test]
    fn test_metadata_file_name() {
        assert_eq!(metadata_file_name("a.mp3", "mp3"), "a.json");
        assert_eq!(metadata_file_name("live.set.mp3", "mp3"), "live.set.json");
        assert_eq!(metadata_file_name("mp3.mp3", "mp3"), "mp3.json");
        assert_eq!(metadata_file_name("clip.wav", "wav"), "clip.json");
    }
}
