//! History errors

use thiserror::Error;

/// Reasons an undo or redo request cannot be served
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    /// Nothing has been recorded yet
    #[error("No undo history")]
    Empty,

    /// Every recorded entry is already undone
    #[error("Nothing to undo")]
    NothingToUndo,

    /// No undone entry is waiting to be redone
    #[error("Nothing to redo")]
    NothingToRedo,
}
