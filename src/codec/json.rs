//! JSON interchange
//!
//! A top-level array maps to root nodes. Primitives become leaves holding
//! their textual rendering, a single-key object whose value is an array
//! becomes a group, and any other shape becomes an empty leaf.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use super::CodecError;
use crate::tree::Node;

/// Convert one JSON value into a node
#[must_use]
pub fn value_to_node(value: &Value) -> Node {
    match value {
        Value::String(text) => Node::leaf(text.as_str()),
        Value::Number(number) => Node::leaf(number.to_string()),
        Value::Bool(flag) => Node::leaf(flag.to_string()),
        Value::Null => Node::leaf("null"),
        Value::Object(map) if map.len() == 1 => match map.iter().next() {
            Some((label, Value::Array(items))) => {
                Node::group(label.as_str(), items.iter().map(value_to_node).collect())
            }
            _ => Node::empty_leaf(),
        },
        Value::Object(_) | Value::Array(_) => Node::empty_leaf(),
    }
}

/// Convert a node back into its JSON shape
#[must_use]
pub fn node_to_value(node: &Node) -> Value {
    match node {
        Node::Leaf(text) => Value::String(text.clone()),
        Node::Group { label, children } => {
            let mut map = Map::new();
            map.insert(
                label.clone(),
                Value::Array(children.iter().map(node_to_value).collect()),
            );
            Value::Object(map)
        }
    }
}

/// Parse a JSON document into root nodes
///
/// # Errors
///
/// Returns `CodecError::Json` for malformed input, or `CodecError::NotAnArray`
/// if the top-level value is not an array.
///
/// # Examples
/// ```
/// use compass::codec::json;
/// use compass::tree::Node;
///
/// let nodes = json::nodes_from_str(r#"["a", 3, {"g": [true, null]}]"#).unwrap();
/// assert_eq!(nodes[1], Node::leaf("3"));
/// assert_eq!(nodes[2], Node::group("g", vec![Node::leaf("true"), Node::leaf("null")]));
/// ```
pub fn nodes_from_str(input: &str) -> Result<Vec<Node>, CodecError> {
    match serde_json::from_str::<Value>(input)? {
        Value::Array(items) => Ok(items.iter().map(value_to_node).collect()),
        _ => Err(CodecError::NotAnArray),
    }
}

/// Render root nodes as pretty-printed JSON
///
/// # Errors
///
/// Returns `CodecError::Json` if serialization fails.
pub fn nodes_to_string(nodes: &[Node]) -> Result<String, CodecError> {
    let value = Value::Array(nodes.iter().map(node_to_value).collect());
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Read and parse a JSON tree file
///
/// # Errors
///
/// Returns `CodecError` if the file cannot be read or parsed.
pub fn load(path: &Path) -> Result<Vec<Node>, CodecError> {
    nodes_from_str(&fs::read_to_string(path)?)
}

/// Write root nodes to a JSON tree file
///
/// # Errors
///
/// Returns `CodecError` if serialization or the write fails.
pub fn save(path: &Path, nodes: &[Node]) -> Result<(), CodecError> {
    fs::write(path, nodes_to_string(nodes)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives() {
        let nodes = nodes_from_str(r#"["text", 1.5, -2, false, null]"#).unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::leaf("text"),
                Node::leaf("1.5"),
                Node::leaf("-2"),
                Node::leaf("false"),
                Node::leaf("null"),
            ]
        );
    }

    #[test]
    fn test_other_shapes_become_empty_leaves() {
        let nodes = nodes_from_str(r#"[[1, 2], {"a": 1}, {"a": [], "b": []}, {}]"#).unwrap();
        assert!(nodes.iter().all(Node::is_placeholder));
        assert_eq!(nodes.len(), 4);
    }

    #[test]
    fn test_nested_groups() {
        let nodes = nodes_from_str(r#"[{"outer": [{"inner": ["x"]}, "y"]}]"#).unwrap();
        assert_eq!(
            nodes,
            vec![Node::group(
                "outer",
                vec![Node::group("inner", vec![Node::leaf("x")]), Node::leaf("y")]
            )]
        );
    }

    #[test]
    fn test_top_level_must_be_array() {
        assert!(matches!(
            nodes_from_str(r#"{"a": []}"#),
            Err(CodecError::NotAnArray)
        ));
        assert!(matches!(nodes_from_str("[1,"), Err(CodecError::Json(_))));
    }

    #[test]
    fn test_write_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        let nodes = vec![Node::group("g", vec![Node::leaf("a")]), Node::leaf("b")];

        save(&path, &nodes).unwrap();
        assert_eq!(load(&path).unwrap(), nodes);
    }
}
