//! The tree element type

use serde::{Deserialize, Serialize};

/// Trailing character that marks a line as a group label
pub const GROUP_DELIMITER: char = ':';

/// One element of the tree: a text leaf or a labeled group of children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// A single line of text
    Leaf(String),
    /// A labeled, ordered sequence of children
    Group { label: String, children: Vec<Node> },
}

impl Node {
    /// Create a leaf node
    #[must_use]
    pub fn leaf(text: impl Into<String>) -> Self {
        Self::Leaf(text.into())
    }

    /// Create a group node with the given children
    #[must_use]
    pub fn group(label: impl Into<String>, children: Vec<Self>) -> Self {
        Self::Group {
            label: label.into(),
            children,
        }
    }

    /// Create a leaf holding the empty string
    #[must_use]
    pub const fn empty_leaf() -> Self {
        Self::Leaf(String::new())
    }

    /// Leaf text or group label
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Leaf(text) => text,
            Self::Group { label, .. } => label,
        }
    }

    /// Replace the leaf text or group label, keeping children
    pub fn set_text(&mut self, text: impl Into<String>) {
        match self {
            Self::Leaf(t) => *t = text.into(),
            Self::Group { label, .. } => *label = text.into(),
        }
    }

    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group { .. })
    }

    /// An empty leaf is a placeholder slot waiting for content
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Leaf(text) if text.is_empty())
    }

    #[must_use]
    pub fn children(&self) -> Option<&[Self]> {
        match self {
            Self::Leaf(_) => None,
            Self::Group { children, .. } => Some(children),
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            Self::Leaf(_) => None,
            Self::Group { children, .. } => Some(children),
        }
    }

    /// Text shown in an edit buffer: the leaf text, or the group label
    /// followed by the group delimiter
    #[must_use]
    pub fn edit_text(&self) -> String {
        match self {
            Self::Leaf(text) => text.clone(),
            Self::Group { label, .. } => format!("{label}{GROUP_DELIMITER}"),
        }
    }

    /// Whether append treats this node as a key (a group, or a leaf whose
    /// text already carries the group delimiter)
    #[must_use]
    pub fn is_key(&self) -> bool {
        match self {
            Self::Group { .. } => true,
            Self::Leaf(text) => is_group_line(text),
        }
    }

    /// Build the node a committed line turns `self` into
    ///
    /// A line ending in the group delimiter yields a group with that label,
    /// keeping existing children, or holding one empty leaf if `self` had
    /// none. Any other line yields a leaf.
    #[must_use]
    pub fn committed(&self, line: &str) -> Self {
        match line.strip_suffix(GROUP_DELIMITER) {
            Some(label) => {
                let children = match self {
                    Self::Group { children, .. } => children.clone(),
                    Self::Leaf(_) => vec![Self::empty_leaf()],
                };
                Self::group(label, children)
            }
            None => Self::leaf(line),
        }
    }

    /// Total number of nodes in this subtree, including `self`
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self
            .children()
            .map_or(0, |children| children.iter().map(Self::count).sum())
    }
}

/// Whether a line of text denotes a group label
#[must_use]
pub fn is_group_line(line: &str) -> bool {
    line.ends_with(GROUP_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_text_of_group_has_delimiter() {
        let node = Node::group("fruits", vec![Node::leaf("apple")]);
        assert_eq!(node.edit_text(), "fruits:");
        assert_eq!(Node::leaf("apple").edit_text(), "apple");
    }

    #[test]
    fn test_committed_group_line_keeps_children() {
        let node = Node::group("fruits", vec![Node::leaf("apple")]);
        let renamed = node.committed("food:");
        assert_eq!(renamed, Node::group("food", vec![Node::leaf("apple")]));
    }

    #[test]
    fn test_committed_group_line_on_leaf_gets_placeholder() {
        let node = Node::leaf("plain");
        assert_eq!(
            node.committed("section:"),
            Node::group("section", vec![Node::empty_leaf()])
        );
    }

    #[test]
    fn test_committed_plain_line_becomes_leaf() {
        let node = Node::group("fruits", vec![Node::leaf("apple")]);
        assert_eq!(node.committed("fruit"), Node::leaf("fruit"));
    }

    #[test]
    fn test_is_key() {
        assert!(Node::group("g", vec![]).is_key());
        assert!(Node::leaf("todo:").is_key());
        assert!(!Node::leaf("todo").is_key());
    }

    #[test]
    fn test_count() {
        let node = Node::group("a", vec![Node::leaf("b"), Node::group("c", vec![Node::leaf("d")])]);
        assert_eq!(node.count(), 4);
    }
}
