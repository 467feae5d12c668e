//! Binary tree records
//!
//! A tree is written as a flat pre-order stream of records:
//!
//! ```text
//! +-----------+------------+------------------+
//! | layer u32 | length u32 | content (length) |
//! +-----------+------------+------------------+
//! ```
//!
//! Integers are little-endian. A group is written as its label followed by
//! the group delimiter, then its children at `layer + 1`.

use std::fs;
use std::path::Path;

use bincode::config::{self, Configuration, Fixint, LittleEndian};

use super::CodecError;
use crate::tree::{GROUP_DELIMITER, Node};

const HEADER_LEN: usize = 8;

fn header_config() -> Configuration<LittleEndian, Fixint> {
    config::standard()
        .with_little_endian()
        .with_fixed_int_encoding()
}

/// Encode root nodes as a record stream
///
/// # Errors
///
/// Returns `CodecError::TooLarge` if a label exceeds `u32::MAX` bytes.
pub fn encode(nodes: &[Node]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    write_layer(nodes, 0, &mut out)?;
    Ok(out)
}

fn write_layer(nodes: &[Node], layer: usize, out: &mut Vec<u8>) -> Result<(), CodecError> {
    for node in nodes {
        let content = node.edit_text();
        let length = u32::try_from(content.len()).map_err(|_| CodecError::TooLarge(content.len()))?;
        let depth = u32::try_from(layer).map_err(|_| CodecError::TooLarge(layer))?;
        out.extend(bincode::encode_to_vec((depth, length), header_config())?);
        out.extend_from_slice(content.as_bytes());
        if let Some(children) = node.children() {
            write_layer(children, layer + 1, out)?;
        }
    }
    Ok(())
}

/// Decode a record stream into root nodes
///
/// # Errors
///
/// Returns `CodecError::Truncated` if the input ends mid-record,
/// `CodecError::LayerJump` if a record skips a level, or
/// `CodecError::InvalidUtf8` for non-UTF-8 content.
pub fn decode(bytes: &[u8]) -> Result<Vec<Node>, CodecError> {
    // open groups, outermost first; the first entry collects root nodes
    let mut stack: Vec<(String, Vec<Node>)> = vec![(String::new(), Vec::new())];
    let mut offset = 0;

    while offset < bytes.len() {
        let header = bytes
            .get(offset..offset + HEADER_LEN)
            .ok_or(CodecError::Truncated(offset))?;
        let ((layer, length), _): ((u32, u32), usize) =
            bincode::decode_from_slice(header, header_config())?;
        let layer = layer as usize;
        let start = offset + HEADER_LEN;
        let end = start + length as usize;
        let content = bytes.get(start..end).ok_or(CodecError::Truncated(offset))?;
        let content = std::str::from_utf8(content).map_err(|_| CodecError::InvalidUtf8(offset))?;

        let open = stack.len() - 1;
        if layer > open {
            return Err(CodecError::LayerJump { offset, from: open, to: layer });
        }
        while stack.len() - 1 > layer {
            close_group(&mut stack);
        }

        match content.strip_suffix(GROUP_DELIMITER) {
            Some(label) => stack.push((label.to_string(), Vec::new())),
            None => {
                if let Some((_, children)) = stack.last_mut() {
                    children.push(Node::leaf(content));
                }
            }
        }
        offset = end;
    }

    while stack.len() > 1 {
        close_group(&mut stack);
    }
    Ok(stack.pop().map(|(_, roots)| roots).unwrap_or_default())
}

fn close_group(stack: &mut Vec<(String, Vec<Node>)>) {
    if let Some((label, children)) = stack.pop() {
        if let Some((_, parent)) = stack.last_mut() {
            parent.push(Node::group(label, children));
        }
    }
}

/// Read and decode a binary tree file
///
/// # Errors
///
/// Returns `CodecError` if the file cannot be read or decoded.
pub fn load(path: &Path) -> Result<Vec<Node>, CodecError> {
    decode(&fs::read(path)?)
}

/// Encode and write a binary tree file
///
/// # Errors
///
/// Returns `CodecError` if encoding or the write fails.
pub fn save(path: &Path, nodes: &[Node]) -> Result<(), CodecError> {
    fs::write(path, encode(nodes)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_layout() {
        let bytes = encode(&[Node::leaf("ab")]).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 0, 2, 0, 0, 0, b'a', b'b']);
    }

    #[test]
    fn test_group_children_are_one_layer_deeper() {
        let bytes = encode(&[Node::group("g", vec![Node::leaf("x")])]).unwrap();
        assert_eq!(&bytes[..HEADER_LEN], &[0, 0, 0, 0, 2, 0, 0, 0]);
        assert_eq!(&bytes[HEADER_LEN..HEADER_LEN + 2], b"g:");
        assert_eq!(&bytes[HEADER_LEN + 2..2 * HEADER_LEN + 2], &[1, 0, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn test_decode_nesting() {
        let tree = vec![
            Node::group("a", vec![Node::group("b", vec![Node::leaf("c")]), Node::leaf("d")]),
            Node::leaf("e"),
        ];
        assert_eq!(decode(&encode(&tree).unwrap()).unwrap(), tree);
    }

    #[test]
    fn test_decode_truncated() {
        let mut bytes = encode(&[Node::leaf("hello")]).unwrap();
        bytes.truncate(10);
        assert!(matches!(decode(&bytes), Err(CodecError::Truncated(0))));
    }

    #[test]
    fn test_decode_layer_jump() {
        let bytes = vec![2, 0, 0, 0, 1, 0, 0, 0, b'x'];
        assert!(matches!(
            decode(&bytes),
            Err(CodecError::LayerJump { from: 0, to: 2, .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(decode(&[]).unwrap().is_empty());
    }
}
