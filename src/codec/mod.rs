//! Persisted tree formats
//!
//! - [`json`]: the interchange format shared with script providers
//! - [`binary`]: a flat pre-order record stream
//!
//! Both helpers pick the format from the file extension via [`load`] and [`save`].

pub mod binary;
pub mod error;
pub mod json;

pub use error::CodecError;

use std::path::Path;

use crate::tree::Node;

/// File extension of the binary format
pub const BINARY_EXTENSION: &str = "ffon";

fn is_binary(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(BINARY_EXTENSION))
}

/// Load a tree file, choosing the codec from its extension
///
/// # Errors
///
/// Returns `CodecError` if the file cannot be read or decoded.
pub fn load(path: &Path) -> Result<Vec<Node>, CodecError> {
    if is_binary(path) {
        binary::load(path)
    } else {
        json::load(path)
    }
}

/// Save a tree file, choosing the codec from its extension
///
/// # Errors
///
/// Returns `CodecError` if the tree cannot be encoded or the file written.
pub fn save(path: &Path, nodes: &[Node]) -> Result<(), CodecError> {
    if is_binary(path) {
        binary::save(path, nodes)
    } else {
        json::save(path, nodes)
    }
}
