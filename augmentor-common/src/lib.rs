//! # Augmentor Common Library
//!
//! Shared code for the augmentor workspace including:
//! - Error types
//! - Bootstrap configuration loading (TOML) and path resolution
//! - Audio decode, encode and resampling

pub mod audio;
pub mod config;
pub mod error;

pub use audio::Waveform;
pub use error::{Error, Result};
