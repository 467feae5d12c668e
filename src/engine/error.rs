//! Engine error kinds
//!
//! Some kinds are silent: the dispatcher turns them into a skipped task with
//! no message. The rest are shown to the user through the message line.

use thiserror::Error;

use crate::history::HistoryError;
use crate::provider::ProviderError;
use crate::tags::TagError;
use crate::tree::{Path, TreeError};

/// Errors raised while running a task
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A marker rule was broken by freshly populated children
    #[error("{0}")]
    StructuralViolation(String),

    /// A path or sibling index did not resolve
    #[error("Out of range: {0}")]
    OutOfRange(TreeError),

    /// No provider is mounted here, or it lacks the capability
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Growing a child sequence failed
    #[error("Allocation failed")]
    AllocationFailure,

    /// Undo or redo had nothing to act on
    #[error("{0}")]
    EmptyHistory(#[from] HistoryError),

    /// The tree at a history entry's path no longer holds what the entry
    /// recorded there
    #[error("History is out of date at [{0}]")]
    StaleHistory(Path),

    /// A provider reported a failure
    #[error("{0}")]
    Provider(String),

    /// The task has no meaning in the current mode or at the current node
    #[error("Not applicable: {0}")]
    NotApplicable(&'static str),
}

impl EngineError {
    /// Whether the error turns the task into a silent no-op
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(
            self,
            Self::OutOfRange(_) | Self::ProviderUnavailable(_) | Self::NotApplicable(_)
        )
    }
}

impl From<TreeError> for EngineError {
    fn from(error: TreeError) -> Self {
        match error {
            TreeError::AllocationFailure => Self::AllocationFailure,
            other => Self::OutOfRange(other),
        }
    }
}

impl From<TagError> for EngineError {
    fn from(error: TagError) -> Self {
        Self::StructuralViolation(error.to_string())
    }
}

impl From<ProviderError> for EngineError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::Unsupported(operation) => Self::ProviderUnavailable(operation.to_string()),
            other => Self::Provider(other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
