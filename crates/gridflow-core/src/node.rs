//! Template document model
//!
//! A template document is a tree of [`Node`]s. Mappings preserve insertion
//! order so a rendered document reads like the one its author wrote.
//! Generator nodes compute their value at resolution time from the
//! parameter mapping instead of going through string substitution.

use crate::error::{Result, TemplateError};
use crate::params::Params;
use std::sync::Arc;

/// A node whose concrete value is produced at resolution time.
///
/// Implementations receive the full parameter mapping. The returned tree is
/// substituted into the document verbatim, without a further resolution
/// pass over it.
pub trait Generator: Send + Sync {
    fn produce(&self, params: &Params) -> Result<Node>;
}

/// One node of a template document.
#[derive(Clone)]
pub enum Node {
    /// String-keyed mapping, insertion order preserved.
    Map(Vec<(String, Node)>),
    /// Ordered sequence.
    Seq(Vec<Node>),
    Str(String),
    Int(i64),
    Bool(bool),
    Null,
    /// Capability invoked with the parameter mapping during resolution.
    Generator(Arc<dyn Generator>),
}

impl Node {
    /// Look up a key in a mapping node. `None` for non-mapping nodes.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Mutable lookup of a key in a mapping node.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        match self {
            Node::Map(pairs) => pairs.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// The document's `Name` field, required for registration.
    pub fn name(&self) -> Option<&str> {
        match self.get("Name") {
            Some(Node::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Insert or replace a key in a mapping node.
    ///
    /// No-op on non-mapping nodes; templates are built in code, so a miss
    /// here is a programming error caught by the registration tests.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) {
        if let Node::Map(pairs) = self {
            let key = key.into();
            match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some((_, v)) => *v = value,
                None => pairs.push((key, value)),
            }
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Node]> {
        match self {
            Node::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// Convert a fully resolved document to JSON for rendering or provider
    /// submission. Fails if a generator node is still present.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        match self {
            Node::Map(pairs) => {
                let mut map = serde_json::Map::with_capacity(pairs.len());
                for (key, value) in pairs {
                    map.insert(key.clone(), value.to_json()?);
                }
                Ok(serde_json::Value::Object(map))
            }
            Node::Seq(items) => Ok(serde_json::Value::Array(
                items
                    .iter()
                    .map(|item| item.to_json())
                    .collect::<Result<Vec<_>>>()?,
            )),
            Node::Str(s) => Ok(serde_json::Value::String(s.clone())),
            Node::Int(n) => Ok(serde_json::Value::Number((*n).into())),
            Node::Bool(b) => Ok(serde_json::Value::Bool(*b)),
            Node::Null => Ok(serde_json::Value::Null),
            Node::Generator(_) => Err(TemplateError::UnresolvedGenerator),
        }
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Node::Null,
            serde_json::Value::Bool(b) => Node::Bool(b),
            // Template scalars are integers; a non-integer number has no
            // scalar kind and is carried as its literal text.
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Node::Int)
                .unwrap_or_else(|| Node::Str(n.to_string())),
            serde_json::Value::String(s) => Node::Str(s),
            serde_json::Value::Array(items) => {
                Node::Seq(items.into_iter().map(Node::from).collect())
            }
            serde_json::Value::Object(map) => Node::Map(
                map.into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Str(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Str(s)
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Int(n)
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Map(pairs) => f.debug_map().entries(pairs.iter().map(|(k, v)| (k, v))).finish(),
            Node::Seq(items) => f.debug_list().entries(items).finish(),
            Node::Str(s) => write!(f, "{s:?}"),
            Node::Int(n) => write!(f, "{n}"),
            Node::Bool(b) => write!(f, "{b}"),
            Node::Null => write!(f, "null"),
            Node::Generator(_) => write!(f, "<generator>"),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Map(a), Node::Map(b)) => a == b,
            (Node::Seq(a), Node::Seq(b)) => a == b,
            (Node::Str(a), Node::Str(b)) => a == b,
            (Node::Int(a), Node::Int(b)) => a == b,
            (Node::Bool(a), Node::Bool(b)) => a == b,
            (Node::Null, Node::Null) => true,
            // Generators compare by identity: two capabilities are only the
            // same node if they are the same allocation.
            (Node::Generator(a), Node::Generator(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
