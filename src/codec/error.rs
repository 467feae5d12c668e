//! Codec errors

use thiserror::Error;

/// Failures while reading or writing persisted trees
#[derive(Debug, Error)]
pub enum CodecError {
    /// JSON could not be parsed or produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON document's top level is not an array
    #[error("Top-level JSON value must be an array")]
    NotAnArray,

    /// Record header could not be encoded
    #[error("Binary encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    /// Record header could not be decoded
    #[error("Binary decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    /// Input ended inside a record
    #[error("Truncated record at byte {0}")]
    Truncated(usize),

    /// A record's layer skips one or more levels
    #[error("Record at byte {offset} jumps from layer {from} to layer {to}")]
    LayerJump { offset: usize, from: usize, to: usize },

    /// Record content is not valid UTF-8
    #[error("Invalid UTF-8 in record at byte {0}")]
    InvalidUtf8(usize),

    /// A node's content does not fit in a record
    #[error("Record content of {0} bytes is too large")]
    TooLarge(usize),

    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
