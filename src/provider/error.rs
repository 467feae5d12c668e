//! Provider errors
//!
//! `Unsupported` is how an adapter reports a missing optional capability; the
//! engine treats it as a silent skip. Every other variant carries a message
//! worth showing to the user.

use thiserror::Error;

use crate::codec::CodecError;

/// Errors returned by provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The adapter does not implement this optional operation
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    /// Filesystem access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider output could not be decoded
    #[error("Invalid provider output: {0}")]
    Codec(#[from] CodecError),

    /// An external script exited unsuccessfully
    #[error("Script failed ({status}): {stderr}")]
    Script { status: String, stderr: String },

    /// The requested location or item does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request was rejected by the adapter
    #[error("Invalid request: {0}")]
    Invalid(String),

    /// Provider-private configuration could not be loaded or saved
    #[error("Config error: {0}")]
    Config(String),
}

impl ProviderError {
    /// Whether the error only signals a missing capability
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
