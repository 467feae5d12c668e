//! Undo/redo history
//!
//! A bounded log of structural edits. Each entry owns deep copies of the node
//! before and after the edit, so later changes to the live tree never reach
//! into history.
//!
//! The redo cursor counts how many entries, from the newest backwards, are
//! currently undone. Recording a new entry discards those undone entries.

pub mod error;

pub use error::HistoryError;

use std::collections::VecDeque;

use tracing::debug;

use crate::engine::Task;
use crate::tree::{Node, Path};

/// Default number of entries kept
pub const DEFAULT_CAPACITY: usize = 500;

/// How an entry changes the tree, derived from which snapshots it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A node was inserted at the entry path
    Insertion,
    /// A node was removed from the entry path
    Removal,
    /// The node at the entry path was replaced
    Replacement,
}

/// One reversible structural edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoEntry {
    /// Where the edit happened
    pub path: Path,
    pub task: Task,
    /// The node at `path` before the edit, if one was there
    pub before: Option<Node>,
    /// The node at `path` after the edit, if one is there
    pub after: Option<Node>,
    /// Cursor when the task started
    pub cursor_before: Path,
    /// Cursor when the task finished
    pub cursor_after: Path,
}

impl UndoEntry {
    /// Classify the edit, or `None` for an entry holding no snapshot
    #[must_use]
    pub const fn change(&self) -> Option<Change> {
        match (&self.before, &self.after) {
            (None, Some(_)) => Some(Change::Insertion),
            (Some(_), None) => Some(Change::Removal),
            (Some(_), Some(_)) => Some(Change::Replacement),
            (None, None) => None,
        }
    }
}

/// Bounded undo/redo log
#[derive(Debug, Clone)]
pub struct UndoHistory {
    entries: VecDeque<UndoEntry>,
    undone: usize,
    capacity: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl UndoHistory {
    /// Create a history keeping at most `capacity` entries (at least one)
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            undone: 0,
            capacity: capacity.max(1),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently undone and available to redo
    #[must_use]
    pub const fn undone(&self) -> usize {
        self.undone
    }

    /// Append an entry, discarding any undone entries first and evicting the
    /// oldest entry once capacity is exceeded
    pub fn record(&mut self, entry: UndoEntry) {
        if self.undone > 0 {
            let keep = self.entries.len() - self.undone;
            self.entries.truncate(keep);
            debug!("Discarded {} undone history entries", self.undone);
            self.undone = 0;
        }
        debug!("Recorded {:?} at {}", entry.task, entry.path);
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Entry the next undo would invert, leaving the redo cursor alone
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Empty` when nothing was recorded, or
    /// `HistoryError::NothingToUndo` when every entry is already undone.
    pub fn peek_undo(&self) -> Result<&UndoEntry, HistoryError> {
        if self.entries.is_empty() {
            return Err(HistoryError::Empty);
        }
        let index = self
            .entries
            .len()
            .checked_sub(self.undone + 1)
            .ok_or(HistoryError::NothingToUndo)?;
        self.entries.get(index).ok_or(HistoryError::NothingToUndo)
    }

    /// Entry the next redo would replay, leaving the redo cursor alone
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Empty` when nothing was recorded, or
    /// `HistoryError::NothingToRedo` when no entry is undone.
    pub fn peek_redo(&self) -> Result<&UndoEntry, HistoryError> {
        if self.entries.is_empty() {
            return Err(HistoryError::Empty);
        }
        if self.undone == 0 {
            return Err(HistoryError::NothingToRedo);
        }
        let index = self.entries.len() - self.undone;
        self.entries.get(index).ok_or(HistoryError::NothingToRedo)
    }

    /// Step back one entry and return it for inversion
    ///
    /// # Errors
    ///
    /// Same as [`UndoHistory::peek_undo`].
    pub fn undo(&mut self) -> Result<&UndoEntry, HistoryError> {
        self.peek_undo()?;
        self.undone += 1;
        let index = self.entries.len() - self.undone;
        self.entries.get(index).ok_or(HistoryError::NothingToUndo)
    }

    /// Step forward one entry and return it for replay
    ///
    /// # Errors
    ///
    /// Same as [`UndoHistory::peek_redo`].
    pub fn redo(&mut self) -> Result<&UndoEntry, HistoryError> {
        self.peek_redo()?;
        let index = self.entries.len() - self.undone;
        self.undone -= 1;
        self.entries.get(index).ok_or(HistoryError::NothingToRedo)
    }

    /// Forget every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.undone = 0;
    }
}
