//! Parsed-node boundary
//!
//! A [`Node`] graph is what a YAML reader hands over and what a writer
//! consumes: scalars, sequences and mappings, each with an optional tag and
//! the comments found around it. `serde_yaml` produces plain values without
//! comments; [`Node::from_value`] bridges those, while readers that keep
//! comments build nodes directly.

use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Value};

use crate::comments::CommentSet;

/// Shape of a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Null, bool, number or string
    Scalar(Value),
    /// Ordered items
    Sequence(Vec<Node>),
    /// Ordered key/value node pairs
    Mapping(Vec<(Node, Node)>),
}

/// Node of a parsed document
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node shape and content
    pub kind: NodeKind,
    /// Tag without the leading `!`
    pub tag: Option<String>,
    /// Comments around the node
    pub comments: CommentSet,
}

impl Node {
    /// Create node of given kind
    #[inline]
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            tag: None,
            comments: CommentSet::default(),
        }
    }

    /// Create scalar node
    #[inline]
    #[must_use]
    pub fn scalar(value: impl Into<Value>) -> Self {
        Self::new(NodeKind::Scalar(value.into()))
    }

    /// Create sequence node
    #[inline]
    #[must_use]
    pub fn sequence(items: Vec<Node>) -> Self {
        Self::new(NodeKind::Sequence(items))
    }

    /// Create mapping node
    #[inline]
    #[must_use]
    pub fn mapping(entries: Vec<(Node, Node)>) -> Self {
        Self::new(NodeKind::Mapping(entries))
    }

    /// Set tag (a leading `!` is stripped)
    #[inline]
    #[must_use]
    pub fn with_tag(mut self, tag: impl AsRef<str>) -> Self {
        self.tag = Some(normalize_tag(tag.as_ref()));
        self
    }

    /// Set comments
    #[inline]
    #[must_use]
    pub fn with_comments(mut self, comments: CommentSet) -> Self {
        self.comments = comments;
        self
    }

    /// Check if node is a mapping
    #[inline]
    #[must_use]
    pub fn is_mapping(&self) -> bool {
        matches!(self.kind, NodeKind::Mapping(_))
    }

    /// Convert a plain value; tagged values keep their tag on the node
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Sequence(items) => {
                Self::sequence(items.into_iter().map(Self::from_value).collect())
            }
            Value::Mapping(mapping) => Self::mapping(
                mapping
                    .into_iter()
                    .map(|(key, value)| (Self::from_value(key), Self::from_value(value)))
                    .collect(),
            ),
            Value::Tagged(tagged) => {
                let TaggedValue { tag, value } = *tagged;
                Self::from_value(value).with_tag(tag.to_string())
            }
            scalar => Self::scalar(scalar),
        }
    }

    /// Convert into a plain value, dropping comments
    #[must_use]
    pub fn into_value(self) -> Value {
        let content = match self.kind {
            NodeKind::Scalar(value) => value,
            NodeKind::Sequence(items) => {
                Value::Sequence(items.into_iter().map(Self::into_value).collect())
            }
            NodeKind::Mapping(entries) => {
                let mut mapping = Mapping::with_capacity(entries.len());
                for (key, value) in entries {
                    mapping.insert(key.into_value(), value.into_value());
                }
                Value::Mapping(mapping)
            }
        };
        match self.tag {
            Some(tag) => tagged(&tag, content),
            None => content,
        }
    }
}

/// Strip the leading `!` of a tag
#[must_use]
pub fn normalize_tag(tag: &str) -> String {
    tag.strip_prefix('!').unwrap_or(tag).to_string()
}

/// Wrap `value` in `tag`; empty tags leave the value untouched
#[must_use]
pub fn tagged(tag: &str, value: Value) -> Value {
    if tag.is_empty() {
        return value;
    }
    Value::Tagged(Box::new(TaggedValue {
        tag: Tag::new(tag),
        value,
    }))
}
