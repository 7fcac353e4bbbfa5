//! # JSON Tree Traversal
//!
//! Payloads are arbitrary JSON trees. [`Node`] gives each value an explicit
//! shape and [`visit`] walks the tree depth-first in pre-order, building the
//! structural [`JsonPath`] of every node as it descends.
//!
//! Path syntax: object key descent appends `/key` (no leading slash at the
//! root), array descent appends `[index]`. The root itself has the empty path.

use std::fmt;

use serde_json::{Map, Value};

/// Shape of a JSON value as seen by the traversal.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// A JSON object.
    Object(&'a Map<String, Value>),
    /// A JSON array.
    Sequence(&'a [Value]),
    /// Any other JSON value (string, number, bool, null).
    Scalar(&'a Value),
}

impl<'a> Node<'a> {
    /// Classify a JSON value by shape.
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Node::Object(map),
            Value::Array(items) => Node::Sequence(items),
            other => Node::Scalar(other),
        }
    }
}

/// Structural location of a node inside a payload, e.g. `message/order/items[0]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPath(String);

impl JsonPath {
    /// The path of the payload root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of the child reached through object key `key`.
    pub fn key(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}/{key}", self.0))
        }
    }

    /// Path of the child at array position `index`.
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// True for the payload root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw path string (empty for the root).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path for human-facing messages: `root` for the payload root.
    pub fn display_or_root(&self) -> &str {
        if self.0.is_empty() {
            "root"
        } else {
            &self.0
        }
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Visit every node of `root` depth-first in pre-order.
///
/// The callback sees a node before any of its descendants, and siblings in
/// document order (object members in map iteration order, array elements by
/// index).
pub fn visit<'a, F>(root: &'a Value, callback: &mut F)
where
    F: FnMut(&JsonPath, &'a Value),
{
    visit_at(root, &JsonPath::root(), callback);
}

fn visit_at<'a, F>(value: &'a Value, path: &JsonPath, callback: &mut F)
where
    F: FnMut(&JsonPath, &'a Value),
{
    callback(path, value);
    match Node::of(value) {
        Node::Object(map) => {
            for (key, child) in map {
                visit_at(child, &path.key(key), callback);
            }
        }
        Node::Sequence(items) => {
            for (idx, child) in items.iter().enumerate() {
                visit_at(child, &path.index(idx), callback);
            }
        }
        Node::Scalar(_) => {}
    }
}
