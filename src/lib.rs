//! Compass - a modal navigator and editor for hierarchical documents
//!
//! This library provides a tree of text leaves and labeled groups, a
//! path-addressed engine that turns discrete tasks into tree edits with
//! undo/redo, and a provider protocol through which groups are lazily filled
//! from a filesystem, a settings store or an external script.

use thiserror::Error;

pub mod cli;
pub mod codec;
pub mod config;
pub mod engine;
pub mod history;
pub mod logging;
pub mod overlay;
pub mod provider;
pub mod registry;
pub mod tags;
pub mod tree;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum CompassError {
    /// Tree addressing error
    #[error("Tree error: {0}")]
    TreeError(#[from] tree::TreeError),
    /// Marker rule violation
    #[error("Tag error: {0}")]
    TagError(#[from] tags::TagError),
    /// Persistence format error
    #[error("Codec error: {0}")]
    CodecError(#[from] codec::CodecError),
    /// Content source error
    #[error("Provider error: {0}")]
    ProviderError(#[from] provider::ProviderError),
    /// Undo/redo error
    #[error("History error: {0}")]
    HistoryError(#[from] history::HistoryError),
    /// Task error
    #[error("{0}")]
    EngineError(#[from] engine::EngineError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
