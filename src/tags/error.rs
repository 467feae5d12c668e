//! Tagged-content errors

use thiserror::Error;

/// Violations of the structural rules attached to markers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TagError {
    /// Two or more children of a radio group carry the checked marker
    #[error("Radio group must have at most one checked item")]
    MultipleChecked,

    /// A radio group holds a group child
    #[error("Radio group children must be leaves")]
    NonLeafChild,
}
