//! Modes and tasks

use std::fmt;

/// The two general-navigation variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flavor {
    /// Free editing of the cached tree
    Editor,
    /// Provider-backed navigation: Enter descends, Insert edits fields only
    #[default]
    Operator,
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Editor => f.write_str("editor"),
            Self::Operator => f.write_str("operator"),
        }
    }
}

/// Current focus of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Moving through the tree
    General(Flavor),
    /// Editing the addressed node's text in the input buffer
    Insert(Flavor),
    /// Filtering the current layer
    SimpleSearch,
    /// Filtering a deep, cross-layer listing
    ExtendedSearch,
    /// Choosing a command, or an item for a pending command
    RunCommand,
}

impl Default for Mode {
    fn default() -> Self {
        Self::General(Flavor::default())
    }
}

impl Mode {
    /// Flavor of a general or insert mode
    #[must_use]
    pub const fn flavor(self) -> Option<Flavor> {
        match self {
            Self::General(flavor) | Self::Insert(flavor) => Some(flavor),
            Self::SimpleSearch | Self::ExtendedSearch | Self::RunCommand => None,
        }
    }

    #[must_use]
    pub const fn is_general(self) -> bool {
        matches!(self, Self::General(_))
    }

    #[must_use]
    pub const fn is_insert(self) -> bool {
        matches!(self, Self::Insert(_))
    }

    /// Whether the overlay is driven by a search or command buffer
    #[must_use]
    pub const fn is_overlay(self) -> bool {
        matches!(self, Self::SimpleSearch | Self::ExtendedSearch | Self::RunCommand)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General(flavor) => write!(f, "{flavor} general"),
            Self::Insert(flavor) => write!(f, "{flavor} insert"),
            Self::SimpleSearch => f.write_str("simple search"),
            Self::ExtendedSearch => f.write_str("extended search"),
            Self::RunCommand => f.write_str("run command"),
        }
    }
}

/// One discrete operation dispatched to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Up,
    Down,
    Left,
    Right,
    /// Create an empty sibling after the cursor
    Append,
    /// Create an empty sibling after the last one
    AppendAppend,
    /// Edit the addressed node
    Insert,
    /// Edit the first sibling
    InsertInsert,
    Delete,
    /// Commit the open edit buffer
    Input,
    Cut,
    Copy,
    Paste,
    Undo,
    Redo,
}

impl Task {
    /// Whether a successful run of this task is logged in the undo history
    #[must_use]
    pub const fn is_recorded(self) -> bool {
        matches!(
            self,
            Self::Append | Self::AppendAppend | Self::Delete | Self::Input | Self::Cut | Self::Paste
        )
    }

    #[must_use]
    pub const fn is_navigation(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }
}
