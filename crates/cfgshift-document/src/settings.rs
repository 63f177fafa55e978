//! Per-document settings

use std::sync::Arc;

use crate::route::{Route, RouteError, DEFAULT_SEPARATOR};
use crate::types::{TypeAdapter, TypeRegistry};

/// How mapping keys are stored when a document is constructed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyFormat {
    /// Scalar keys are converted to strings (`1: x` is stored under `"1"`)
    #[default]
    String,

    /// Keys are kept as the values they were parsed as
    Object,
}

/// Immutable settings of one document
///
/// Passed explicitly when a document is created; nothing is read from global
/// state.
#[derive(Debug, Clone)]
pub struct DocumentSettings {
    separator: char,
    key_format: KeyFormat,
    types: TypeRegistry,
    indent: usize,
}

impl DocumentSettings {
    /// Create default settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With route separator
    #[inline]
    #[must_use]
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// With key format
    #[inline]
    #[must_use]
    pub fn with_key_format(mut self, key_format: KeyFormat) -> Self {
        self.key_format = key_format;
        self
    }

    /// With custom type adapter for `tag`
    #[must_use]
    pub fn with_type(mut self, tag: &str, adapter: impl TypeAdapter + 'static) -> Self {
        self.types.register(tag, Arc::new(adapter));
        self
    }

    /// With whole adapter registry
    #[inline]
    #[must_use]
    pub fn with_types(mut self, types: TypeRegistry) -> Self {
        self.types = types;
        self
    }

    /// With dump indentation (at least one space)
    #[inline]
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self
    }

    /// Route separator
    #[inline]
    #[must_use]
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Key format
    #[inline]
    #[must_use]
    pub fn key_format(&self) -> KeyFormat {
        self.key_format
    }

    /// Custom type adapters
    #[inline]
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Dump indentation
    #[inline]
    #[must_use]
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Parse a route string with this document's separator
    ///
    /// # Errors
    /// Returns [`RouteError::Empty`] for empty text
    #[inline]
    pub fn route(&self, text: &str) -> Result<Route, RouteError> {
        Route::from_string(text, self.separator)
    }
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            key_format: KeyFormat::default(),
            types: TypeRegistry::default(),
            indent: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = DocumentSettings::new();
        assert_eq!(settings.separator(), '.');
        assert_eq!(settings.key_format(), KeyFormat::String);
        assert!(settings.types().is_empty());
        assert_eq!(settings.indent(), 2);
    }

    #[test]
    fn route_uses_separator() {
        let settings = DocumentSettings::new().with_separator('/');
        let route = settings.route("a.b/c").unwrap();
        assert_eq!(route.len(), 2);
    }

    #[test]
    fn indent_is_at_least_one() {
        assert_eq!(DocumentSettings::new().with_indent(0).indent(), 1);
    }
}
