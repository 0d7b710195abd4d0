//! Error types for augmentor
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the augmentation pipeline
#[derive(Error, Debug)]
pub enum AugmentError {
    /// Input directory missing, output directory not creatable, write failure
    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A step was configured with inconsistent parameters
    #[error("Invalid augmentation parameters: {0}")]
    InvalidParameters(String),

    /// A transform failed while processing a signal
    #[error("Transform {name} failed: {reason}")]
    Transform { name: String, reason: String },

    /// Metadata record could not be serialized
    #[error("Metadata serialization error: {0}")]
    Metadata(#[from] serde_json::Error),

    /// Decode, encode, config and I/O errors from augmentor-common
    #[error(transparent)]
    Common(#[from] augmentor_common::Error),
}

impl AugmentError {
    /// Wrap an I/O error with the path it concerns
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AugmentError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// True when an input file could not be decoded
    pub fn is_decode(&self) -> bool {
        matches!(self, AugmentError::Common(e) if e.is_decode())
    }

    /// True when an output file could not be encoded
    pub fn is_encode(&self) -> bool {
        matches!(self, AugmentError::Common(e) if e.is_encode())
    }
}

/// Convenience Result type using AugmentError
pub type Result<T> = std::result::Result<T, AugmentError>;
