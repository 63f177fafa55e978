//! Blocks: stored values with their comments
//!
//! A [`Block`] is either a [`Terminal`] (scalar, sequence, or any value that is
//! not a section) or a [`Section`]. Code that reconciles trees matches on the
//! variant instead of probing types at runtime.

use serde_yaml::Value;

use crate::comments::Comments;
use crate::route::Route;
use crate::section::Section;

/// Non-section value with comments
#[derive(Debug, Clone, PartialEq)]
pub struct Terminal {
    value: Value,
    comments: Comments,
    keep: bool,
}

impl Terminal {
    /// Create terminal without comments
    #[inline]
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self::with_comments(value, Comments::new())
    }

    /// Create terminal reusing `comments` (e.g. from the block it replaces)
    #[inline]
    #[must_use]
    pub fn with_comments(value: Value, comments: Comments) -> Self {
        Self {
            value,
            comments,
            keep: false,
        }
    }

    /// Stored value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Mutable stored value
    #[inline]
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Take the stored value
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Attached comments
    #[inline]
    #[must_use]
    pub fn comments(&self) -> &Comments {
        &self.comments
    }

    /// Mutable attached comments
    #[inline]
    pub fn comments_mut(&mut self) -> &mut Comments {
        &mut self.comments
    }
}

/// Storage unit of a section: a terminal value or a nested section
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Leaf value
    Terminal(Terminal),
    /// Nested mapping
    Section(Section),
}

impl Block {
    /// Terminal block without comments
    #[inline]
    #[must_use]
    pub fn terminal(value: impl Into<Value>) -> Self {
        Self::Terminal(Terminal::new(value.into()))
    }

    /// Build a block from a plain value
    ///
    /// Mappings become sections (keys taken as they are), everything else a
    /// terminal. The block is detached until inserted into a section.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Mapping(mapping) => {
                let mut section = Section::new();
                for (key, value) in mapping {
                    section.insert(key, Self::from_value(value));
                }
                Self::Section(section)
            }
            other => Self::Terminal(Terminal::new(other)),
        }
    }

    /// Check if block is a section
    #[inline]
    #[must_use]
    pub fn is_section(&self) -> bool {
        matches!(self, Self::Section(_))
    }

    /// Section reference, if the block is one
    #[inline]
    #[must_use]
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Self::Section(section) => Some(section),
            Self::Terminal(_) => None,
        }
    }

    /// Mutable section reference, if the block is one
    #[inline]
    pub fn as_section_mut(&mut self) -> Option<&mut Section> {
        match self {
            Self::Section(section) => Some(section),
            Self::Terminal(_) => None,
        }
    }

    /// Terminal value, if the block is a terminal
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Terminal(terminal) => Some(terminal.value()),
            Self::Section(_) => None,
        }
    }

    /// Attached comments
    #[inline]
    #[must_use]
    pub fn comments(&self) -> &Comments {
        match self {
            Self::Terminal(terminal) => terminal.comments(),
            Self::Section(section) => section.comments(),
        }
    }

    /// Mutable attached comments
    #[inline]
    pub fn comments_mut(&mut self) -> &mut Comments {
        match self {
            Self::Terminal(terminal) => terminal.comments_mut(),
            Self::Section(section) => section.comments_mut(),
        }
    }

    /// Replace comments, returning the block
    #[inline]
    #[must_use]
    pub fn with_comments(mut self, comments: Comments) -> Self {
        *self.comments_mut() = comments;
        self
    }

    /// Check the transient keep flag
    #[inline]
    #[must_use]
    pub fn is_kept(&self) -> bool {
        match self {
            Self::Terminal(terminal) => terminal.keep,
            Self::Section(section) => section.keep,
        }
    }

    /// Set the transient keep flag, which protects the block from pruning
    #[inline]
    pub fn set_keep(&mut self, keep: bool) {
        match self {
            Self::Terminal(terminal) => terminal.keep = keep,
            Self::Section(section) => section.keep = keep,
        }
    }

    /// Plain value of the block, comments dropped
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Terminal(terminal) => terminal.value.clone(),
            Self::Section(section) => section.to_value(),
        }
    }

    /// Re-root a section block under `route`
    pub(crate) fn adapt(&mut self, route: Route) {
        if let Self::Section(section) = self {
            section.adapt(Some(route));
        }
    }
}

impl From<Terminal> for Block {
    fn from(terminal: Terminal) -> Self {
        Self::Terminal(terminal)
    }
}

impl From<Section> for Block {
    fn from(section: Section) -> Self {
        Self::Section(section)
    }
}
