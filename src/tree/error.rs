//! Tree addressing errors
//!
//! Raised by the path-addressed reads and the crate-private mutation helpers
//! when a path does not resolve against the current tree.

use thiserror::Error;

/// Errors produced while resolving a [`Path`](super::Path) against a tree
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// An index along the path does not exist in its sibling sequence
    #[error("Index {index} out of range at depth {depth}")]
    OutOfRange { depth: usize, index: usize },

    /// An ancestor along the path is a leaf and has no children
    #[error("Node at depth {depth} is not a group")]
    NotAGroup { depth: usize },

    /// Pushing onto the path would exceed the maximum depth
    #[error("Path depth limit of {0} exceeded")]
    DepthExceeded(usize),

    /// The path addresses nothing (depth zero)
    #[error("Empty path")]
    EmptyPath,

    /// Growing a child sequence failed
    #[error("Allocation failed while growing a child sequence")]
    AllocationFailure,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
