//! `$id` / `$ref` node model, identifier index, and reference resolution
//!
//! The model document avoids duplicating shared substructures: any object
//! may declare an identifier (`$id`) at its definition site, and any other
//! position may hold `{"$ref": <id>}` instead of an inline copy. Extraction
//! builds one identifier index per document and dereferences through it.
//!
//! Resolution is total: it always yields a [`Resolved`] mapping view, never
//! an error. A dangling reference resolves to the empty view, and every
//! field accessor on the empty view yields its caller-supplied default, so
//! partial or inconsistent exports still produce a best-effort result.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Field marking a definition site
pub const ID_FIELD: &str = "$id";

/// Field marking a use site pointing at a definition
pub const REF_FIELD: &str = "$ref";

/// Canonicalized node identifier.
///
/// Exporters write `$id` as a JSON string or number; both canonicalize to
/// decimal text, so `1` and `"1"` name the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Read an identifier out of a JSON value, if it is one
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classified view of one raw document value
#[derive(Debug, Clone)]
pub enum RawNode<'a> {
    /// Mapping that declares an identifier
    Definition {
        id: NodeId,
        fields: &'a Map<String, Value>,
    },

    /// Mapping that stands in for another node
    Reference { target: NodeId },

    /// Mapping with neither `$id` nor `$ref`
    Plain { fields: &'a Map<String, Value> },

    /// Ordered sequence
    Sequence { items: &'a [Value] },

    /// Anything else (string, number, bool, null)
    Scalar,
}

impl<'a> RawNode<'a> {
    /// Classify a raw value.
    ///
    /// A node is never both a definition and a reference in known exports;
    /// if one ever is, the reference wins here (the index builder still
    /// records its `$id` independently).
    pub fn classify(value: &'a Value) -> RawNode<'a> {
        match value {
            Value::Object(fields) => {
                if let Some(target) = fields.get(REF_FIELD).and_then(NodeId::from_value) {
                    RawNode::Reference { target }
                } else if let Some(id) = fields.get(ID_FIELD).and_then(NodeId::from_value) {
                    RawNode::Definition { id, fields }
                } else {
                    RawNode::Plain { fields }
                }
            }
            Value::Array(items) => RawNode::Sequence { items },
            _ => RawNode::Scalar,
        }
    }
}

/// Mapping from identifier to definition fields.
///
/// Built once per document load, read-only thereafter.
#[derive(Debug)]
pub struct IdentifierIndex<'a> {
    entries: HashMap<NodeId, &'a Map<String, Value>>,
}

impl<'a> IdentifierIndex<'a> {
    /// Walk the whole document and index every object declaring `$id`.
    ///
    /// The walk uses an explicit work stack, not call recursion, so
    /// arbitrarily deep documents cannot overflow the thread stack.
    /// Duplicate identifiers keep whichever definition the stack visits
    /// last; the source format leaves that order undefined and nothing
    /// downstream depends on it.
    pub fn build(document: &'a Value) -> Self {
        let mut entries = HashMap::new();
        let mut stack = vec![document];

        while let Some(value) = stack.pop() {
            match value {
                Value::Object(fields) => {
                    if let Some(id) = fields.get(ID_FIELD).and_then(NodeId::from_value) {
                        entries.insert(id, fields);
                    }
                    stack.extend(fields.values());
                }
                Value::Array(items) => stack.extend(items.iter()),
                _ => {}
            }
        }

        Self { entries }
    }

    /// Look up a definition by identifier
    pub fn get(&self, id: &NodeId) -> Option<&'a Map<String, Value>> {
        self.entries.get(id).copied()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of resolving a value: always a mapping view, possibly empty.
///
/// Field accessors take an ordered list of candidate keys and a default;
/// the first present, non-empty candidate wins. This is the one extraction
/// idiom the whole pipeline relies on to tolerate schema variation between
/// exporter versions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolved<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> Resolved<'a> {
    /// The empty view: every lookup yields its default
    pub fn empty() -> Self {
        Self { fields: None }
    }

    pub fn from_fields(fields: &'a Map<String, Value>) -> Self {
        Self {
            fields: Some(fields),
        }
    }

    /// True when this view resolved to nothing
    pub fn is_empty(&self) -> bool {
        self.fields.is_none()
    }

    /// Raw field access
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.and_then(|fields| fields.get(key))
    }

    /// First candidate key holding a non-empty string
    pub fn first_str(&self, keys: &[&str]) -> Option<&'a str> {
        keys.iter().find_map(|key| {
            self.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
    }

    /// String field with fallback keys and a default
    pub fn str_or(&self, keys: &[&str], default: &str) -> String {
        self.first_str(keys).unwrap_or(default).to_string()
    }

    /// First candidate key holding a scalar, rendered as text.
    ///
    /// Some exporters write type tags as numbers; those render as decimal
    /// text rather than falling through to the default.
    pub fn first_scalar(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .find_map(|key| self.get(key).and_then(scalar_text))
    }

    /// Scalar field with fallback keys and a default, rendered as text
    pub fn scalar_or(&self, keys: &[&str], default: &str) -> String {
        self.first_scalar(keys)
            .unwrap_or_else(|| default.to_string())
    }

    /// Scalar field with key-presence fallback.
    ///
    /// The first key that exists wins, even when it holds an empty string;
    /// the default only applies when no candidate key is present (or the
    /// winning value is not a scalar). Fields whose absence is the signal,
    /// rather than emptiness, use this accessor.
    pub fn present_scalar_or(&self, keys: &[&str], default: &str) -> String {
        match keys.iter().find_map(|key| self.get(key)) {
            Some(value) => present_text(value).unwrap_or_else(|| default.to_string()),
            None => default.to_string(),
        }
    }

    /// Boolean field with a default
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Sequence field; absent or non-sequence yields the empty slice
    pub fn items(&self, key: &str) -> &'a [Value] {
        self.get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn present_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Resolve a value against the index.
///
/// References are looked up (dangling ones yield the empty view),
/// mappings pass through unchanged, and everything else (sequences,
/// scalars, absent values) yields the empty view. Total: never fails.
pub fn resolve<'a>(value: Option<&'a Value>, index: &IdentifierIndex<'a>) -> Resolved<'a> {
    let Some(value) = value else {
        return Resolved::empty();
    };

    match RawNode::classify(value) {
        RawNode::Reference { target } => match index.get(&target) {
            Some(fields) => Resolved::from_fields(fields),
            None => Resolved::empty(),
        },
        RawNode::Definition { fields, .. } | RawNode::Plain { fields } => {
            Resolved::from_fields(fields)
        }
        RawNode::Sequence { .. } | RawNode::Scalar => Resolved::empty(),
    }
}
