//! Common error types for augmentor

use thiserror::Error;

/// Common result type for augmentor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared across the augmentor crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input could not be parsed as audio
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Output could not be encoded or written
    #[error("Audio encode error: {0}")]
    Encode(String),

    /// Invalid input parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// True for errors raised while decoding an input file
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }

    /// True for errors raised while encoding an output file
    pub fn is_encode(&self) -> bool {
        matches!(self, Error::Encode(_))
    }
}
