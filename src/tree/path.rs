//! Index-sequence addressing

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TreeError;

/// Maximum number of indices a path may hold
pub const MAX_DEPTH: usize = 32;

/// Ordered sibling indices locating one node from the root
///
/// The last index selects a sibling inside its parent's child sequence; every
/// earlier index is the chain of ancestor selections. Depth is bounded by
/// [`MAX_DEPTH`].
///
/// # Examples
/// ```
/// use compass::tree::Path;
///
/// let mut path = Path::from([0, 2]);
/// path.push(1).unwrap();
/// assert_eq!(path.to_string(), "0,2,1");
/// assert_eq!(path.pop(), Some(1));
/// assert_eq!(path.last(), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path {
    indices: Vec<usize>,
}

impl Path {
    /// The zero-depth path, which addresses the root sequence itself
    #[must_use]
    pub const fn root() -> Self {
        Self {
            indices: Vec::new(),
        }
    }

    /// Build a path from a slice of indices
    ///
    /// # Errors
    ///
    /// Returns `TreeError::DepthExceeded` if the slice is longer than [`MAX_DEPTH`].
    pub fn from_slice(indices: &[usize]) -> Result<Self, TreeError> {
        if indices.len() > MAX_DEPTH {
            return Err(TreeError::DepthExceeded(MAX_DEPTH));
        }
        Ok(Self {
            indices: indices.to_vec(),
        })
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.indices.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    #[must_use]
    pub fn first(&self) -> Option<usize> {
        self.indices.first().copied()
    }

    /// The trailing index, selecting a sibling within its parent
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Overwrite the trailing index; no-op on the root path
    pub fn set_last(&mut self, index: usize) {
        if let Some(last) = self.indices.last_mut() {
            *last = index;
        }
    }

    /// Append one level
    ///
    /// # Errors
    ///
    /// Returns `TreeError::DepthExceeded` when the path is already at [`MAX_DEPTH`].
    pub fn push(&mut self, index: usize) -> Result<(), TreeError> {
        if self.indices.len() >= MAX_DEPTH {
            return Err(TreeError::DepthExceeded(MAX_DEPTH));
        }
        self.indices.push(index);
        Ok(())
    }

    /// Remove and return the trailing index
    pub fn pop(&mut self) -> Option<usize> {
        self.indices.pop()
    }

    /// The path of the enclosing group (the root path for depth one)
    #[must_use]
    pub fn parent(&self) -> Self {
        let end = self.indices.len().saturating_sub(1);
        Self {
            indices: self.indices[..end].to_vec(),
        }
    }

    /// A copy of this path with the trailing index replaced
    #[must_use]
    pub fn with_last(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.set_last(index);
        path
    }

    /// The path of child `index` of the node this path addresses
    ///
    /// # Errors
    ///
    /// Returns `TreeError::DepthExceeded` when the path is already at [`MAX_DEPTH`].
    pub fn child(&self, index: usize) -> Result<Self, TreeError> {
        let mut path = self.clone();
        path.push(index)?;
        Ok(path)
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    fn from(indices: [usize; N]) -> Self {
        const { assert!(N <= MAX_DEPTH, "path literal exceeds maximum depth") };
        Self {
            indices: indices.to_vec(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.indices.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}
