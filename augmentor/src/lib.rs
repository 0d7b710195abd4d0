//! # augmentor
//!
//! Batch audio augmentation: every matching file of an input directory is
//! run through an augmentation chain (background noise, pitch shift, time
//! stretch, gain) and written to an output directory together with a JSON
//! sidecar describing the chain.

pub mod augment;
pub mod config;
pub mod error;
pub mod metadata;
pub mod pipeline;

pub use augment::{AugmentationChain, AugmentationStep, Transform};
pub use config::{CliOverrides, ErrorPolicy, RunnerConfig};
pub use error::{AugmentError, Result};
pub use metadata::{MetadataRecord, ParameterSet};
pub use pipeline::{PipelineRunner, RunSummary};
