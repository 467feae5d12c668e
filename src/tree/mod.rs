//! Tree and path data model
//!
//! The document is a sequence of root [`Node`]s. A [`Path`] selects one node by
//! walking sibling indices from the root. The functions here are pure reads;
//! the mutating helpers are crate-private so every structural change goes
//! through the engine and its undo bookkeeping.

pub mod error;
mod node;
mod path;

pub use error::TreeError;
pub use node::{GROUP_DELIMITER, Node, is_group_line};
pub use path::{MAX_DEPTH, Path};

/// Sibling sequence containing the node addressed by `path`
///
/// For the root path this is the root sequence itself.
///
/// # Errors
///
/// Returns `TreeError::OutOfRange` if an ancestor index does not exist, or
/// `TreeError::NotAGroup` if an ancestor is a leaf.
///
/// # Examples
/// ```
/// use compass::tree::{self, Node, Path};
///
/// let tree = vec![Node::group("a", vec![Node::leaf("b"), Node::leaf("c")])];
/// let layer = tree::at(&tree, &Path::from([0, 1])).unwrap();
/// assert_eq!(layer.len(), 2);
/// ```
pub fn at<'a>(tree: &'a [Node], path: &Path) -> Result<&'a [Node], TreeError> {
    let ancestors = ancestors(path);
    let mut layer = tree;
    for (depth, &index) in ancestors.iter().enumerate() {
        let node = layer.get(index).ok_or(TreeError::OutOfRange { depth, index })?;
        layer = node.children().ok_or(TreeError::NotAGroup { depth })?;
    }
    Ok(layer)
}

/// Node addressed by `path`, if it exists
#[must_use]
pub fn node_at<'a>(tree: &'a [Node], path: &Path) -> Option<&'a Node> {
    at(tree, path).ok()?.get(path.last()?)
}

/// Highest valid index among the addressed node's siblings
///
/// `None` when the sibling sequence is empty or cannot be resolved.
#[must_use]
pub fn max_sibling_index(tree: &[Node], path: &Path) -> Option<usize> {
    at(tree, path).ok()?.len().checked_sub(1)
}

/// Whether the addressed node is a group
#[must_use]
pub fn child_layer_exists(tree: &[Node], path: &Path) -> bool {
    node_at(tree, path).is_some_and(Node::is_group)
}

fn ancestors(path: &Path) -> &[usize] {
    let indices = path.as_slice();
    &indices[..indices.len().saturating_sub(1)]
}

pub(crate) fn at_mut<'a>(tree: &'a mut Vec<Node>, path: &Path) -> Result<&'a mut Vec<Node>, TreeError> {
    let mut layer = tree;
    for (depth, &index) in ancestors(path).iter().enumerate() {
        let node = layer
            .get_mut(index)
            .ok_or(TreeError::OutOfRange { depth, index })?;
        layer = node.children_mut().ok_or(TreeError::NotAGroup { depth })?;
    }
    Ok(layer)
}

pub(crate) fn node_at_mut<'a>(tree: &'a mut Vec<Node>, path: &Path) -> Option<&'a mut Node> {
    let index = path.last()?;
    at_mut(tree, path).ok()?.get_mut(index)
}

/// Insert `node` at the addressed position, shifting later siblings right
pub(crate) fn insert(tree: &mut Vec<Node>, path: &Path, node: Node) -> Result<(), TreeError> {
    let index = path.last().ok_or(TreeError::EmptyPath)?;
    let layer = at_mut(tree, path)?;
    if index > layer.len() {
        return Err(TreeError::OutOfRange {
            depth: path.depth() - 1,
            index,
        });
    }
    layer
        .try_reserve(1)
        .map_err(|_| TreeError::AllocationFailure)?;
    layer.insert(index, node);
    Ok(())
}

/// Remove and return the addressed node, shifting later siblings left
pub(crate) fn remove(tree: &mut Vec<Node>, path: &Path) -> Result<Node, TreeError> {
    let index = path.last().ok_or(TreeError::EmptyPath)?;
    let layer = at_mut(tree, path)?;
    if index >= layer.len() {
        return Err(TreeError::OutOfRange {
            depth: path.depth() - 1,
            index,
        });
    }
    Ok(layer.remove(index))
}

/// Replace the addressed node, returning the previous one
pub(crate) fn replace(tree: &mut Vec<Node>, path: &Path, node: Node) -> Result<Node, TreeError> {
    let depth = path.depth().saturating_sub(1);
    let index = path.last().ok_or(TreeError::EmptyPath)?;
    let slot = node_at_mut(tree, path).ok_or(TreeError::OutOfRange { depth, index })?;
    Ok(std::mem::replace(slot, node))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Node> {
        vec![
            Node::leaf("a"),
            Node::group("b", vec![Node::leaf("b0"), Node::leaf("b1")]),
            Node::group("c", vec![]),
        ]
    }

    #[test]
    fn test_at_root_and_nested() {
        let tree = sample();
        assert_eq!(at(&tree, &Path::from([2])).unwrap().len(), 3);
        assert_eq!(at(&tree, &Path::from([1, 0])).unwrap()[1], Node::leaf("b1"));
        assert_eq!(at(&tree, &Path::root()).unwrap().len(), 3);
    }

    #[test]
    fn test_at_errors() {
        let tree = sample();
        assert_eq!(
            at(&tree, &Path::from([5, 0])),
            Err(TreeError::OutOfRange { depth: 0, index: 5 })
        );
        assert_eq!(
            at(&tree, &Path::from([0, 0])),
            Err(TreeError::NotAGroup { depth: 0 })
        );
    }

    #[test]
    fn test_max_sibling_index() {
        let tree = sample();
        assert_eq!(max_sibling_index(&tree, &Path::from([0])), Some(2));
        assert_eq!(max_sibling_index(&tree, &Path::from([1, 0])), Some(1));
        assert_eq!(max_sibling_index(&tree, &Path::from([2, 0])), None);
    }

    #[test]
    fn test_child_layer_exists() {
        let tree = sample();
        assert!(!child_layer_exists(&tree, &Path::from([0])));
        assert!(child_layer_exists(&tree, &Path::from([1])));
        // an unexpanded group still has a (currently empty) child layer
        assert!(child_layer_exists(&tree, &Path::from([2])));
        assert!(!child_layer_exists(&tree, &Path::from([9])));
    }

    #[test]
    fn test_insert_remove_replace() {
        let mut tree = sample();
        insert(&mut tree, &Path::from([1, 2]), Node::leaf("b2")).unwrap();
        assert_eq!(node_at(&tree, &Path::from([1, 2])), Some(&Node::leaf("b2")));

        let removed = remove(&mut tree, &Path::from([1, 0])).unwrap();
        assert_eq!(removed, Node::leaf("b0"));
        assert_eq!(node_at(&tree, &Path::from([1, 0])), Some(&Node::leaf("b1")));

        let old = replace(&mut tree, &Path::from([0]), Node::leaf("z")).unwrap();
        assert_eq!(old, Node::leaf("a"));
        assert_eq!(tree[0], Node::leaf("z"));
    }

    #[test]
    fn test_insert_past_end_is_out_of_range() {
        let mut tree = sample();
        assert!(insert(&mut tree, &Path::from([5]), Node::leaf("x")).is_err());
        assert!(remove(&mut tree, &Path::from([3])).is_err());
        assert_eq!(tree.len(), 3);
    }
}
