//! Cursor arithmetic
//!
//! Computes the path a task moves the cursor to from the path captured at the
//! start of the task. The tree is never consulted here beyond the facts passed
//! in, so mutation code can keep reading the tree through the previous path.

use crate::tree::{Path, TreeError};

use super::Task;

/// Facts about the node at the previous path that steer the arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Addressed {
    /// The node is a group, or a leaf carrying the group delimiter
    pub is_key: bool,
    /// The node is a group and so owns a child layer
    pub has_child_layer: bool,
    /// Highest sibling index in the layer, `None` for an empty layer
    pub max_index: Option<usize>,
}

/// New cursor path for `task`, starting from `previous`
///
/// # Errors
///
/// Returns `TreeError::DepthExceeded` when the task would descend past the
/// maximum path depth.
pub fn advance(task: Task, addressed: Addressed, previous: &Path) -> Result<Path, TreeError> {
    let mut current = previous.clone();
    let Some(last) = previous.last() else {
        return Ok(current);
    };
    let one_past_max = addressed.max_index.map_or(0, |max| max + 1);

    match task {
        Task::Up | Task::Delete | Task::Cut => current.set_last(last.saturating_sub(1)),
        Task::Down => {
            if addressed.max_index.is_some_and(|max| last < max) {
                current.set_last(last + 1);
            }
        }
        Task::Left => {
            if previous.depth() > 1 {
                current.pop();
            }
        }
        Task::Right => {
            if addressed.has_child_layer {
                current.push(0)?;
            }
        }
        Task::Append => {
            if addressed.is_key && !addressed.has_child_layer {
                current.push(0)?;
            } else {
                current.set_last(last + 1);
            }
        }
        Task::AppendAppend => current.set_last(one_past_max),
        Task::InsertInsert => current.set_last(0),
        Task::Insert | Task::Input | Task::Copy | Task::Paste | Task::Undo | Task::Redo => {}
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAF: Addressed = Addressed {
        is_key: false,
        has_child_layer: false,
        max_index: Some(3),
    };
    const GROUP: Addressed = Addressed {
        is_key: true,
        has_child_layer: true,
        max_index: Some(3),
    };
    const KEY_LEAF: Addressed = Addressed {
        is_key: true,
        has_child_layer: false,
        max_index: Some(3),
    };

    fn run(task: Task, addressed: Addressed, from: &[usize]) -> Vec<usize> {
        let previous = Path::from_slice(from).unwrap();
        advance(task, addressed, &previous).unwrap().as_slice().to_vec()
    }

    #[test]
    fn test_append_table() {
        assert_eq!(run(Task::Append, LEAF, &[0, 1]), vec![0, 2]);
        assert_eq!(run(Task::Append, GROUP, &[0, 1]), vec![0, 2]);
        assert_eq!(run(Task::Append, KEY_LEAF, &[0, 1]), vec![0, 1, 0]);
    }

    #[test]
    fn test_append_append_and_insert_insert() {
        for addressed in [LEAF, GROUP, KEY_LEAF] {
            assert_eq!(run(Task::AppendAppend, addressed, &[2, 1]), vec![2, 4]);
            assert_eq!(run(Task::InsertInsert, addressed, &[2, 3]), vec![2, 0]);
            assert_eq!(run(Task::Insert, addressed, &[2, 3]), vec![2, 3]);
        }
    }

    #[test]
    fn test_delete_decrements_only_above_zero() {
        assert_eq!(run(Task::Delete, LEAF, &[1, 2]), vec![1, 1]);
        assert_eq!(run(Task::Delete, LEAF, &[1, 0]), vec![1, 0]);
    }

    #[test]
    fn test_vertical_moves_stay_in_bounds() {
        assert_eq!(run(Task::Up, LEAF, &[0]), vec![0]);
        assert_eq!(run(Task::Down, LEAF, &[3]), vec![3]);
        assert_eq!(run(Task::Down, LEAF, &[2]), vec![3]);
        let empty = Addressed::default();
        assert_eq!(run(Task::Down, empty, &[0]), vec![0]);
    }

    #[test]
    fn test_horizontal_moves() {
        assert_eq!(run(Task::Left, LEAF, &[0]), vec![0]);
        assert_eq!(run(Task::Left, LEAF, &[0, 5]), vec![0]);
        assert_eq!(run(Task::Right, LEAF, &[1]), vec![1]);
        assert_eq!(run(Task::Right, GROUP, &[1]), vec![1, 0]);
    }

    #[test]
    fn test_append_append_on_empty_layer() {
        assert_eq!(run(Task::AppendAppend, Addressed::default(), &[0]), vec![0]);
    }

    #[test]
    fn test_right_at_max_depth_fails() {
        let deep = Path::from_slice(&[0; crate::tree::MAX_DEPTH]).unwrap();
        assert!(advance(Task::Right, GROUP, &deep).is_err());
    }
}
