//! Custom-type adapters
//!
//! A [`TypeAdapter`] turns the content of a tagged node into the value kept in
//! memory and back. In memory the value stays wrapped in its tag
//! (`Value::Tagged`), so it can be represented again when the document is
//! dumped or a block is cloned.

use std::fmt::Debug;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_yaml::Value;

use crate::node::normalize_tag;

/// Error returned by adapters
pub type AdapterError = Box<dyn std::error::Error + Send + Sync>;

/// (De)serialization of one custom YAML tag
pub trait TypeAdapter: Debug + Send + Sync {
    /// Build the in-memory value from the node content
    ///
    /// # Errors
    /// Returns error if the content is not a valid instance of the type
    fn construct(&self, content: Value) -> Result<Value, AdapterError>;

    /// Turn the in-memory value back into node content
    ///
    /// # Errors
    /// Returns error if the value cannot be represented
    fn represent(&self, value: &Value) -> Result<Value, AdapterError>;
}

/// Adapters keyed by tag (without the leading `!`)
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    adapters: IndexMap<String, Arc<dyn TypeAdapter>>,
}

impl TypeRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register adapter, returning the registry
    #[must_use]
    pub fn with(mut self, tag: &str, adapter: impl TypeAdapter + 'static) -> Self {
        self.register(tag, Arc::new(adapter));
        self
    }

    /// Register adapter, replacing any adapter for the same tag
    pub fn register(&mut self, tag: &str, adapter: Arc<dyn TypeAdapter>) {
        self.adapters.insert(normalize_tag(tag), adapter);
    }

    /// Adapter for `tag`
    #[inline]
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&dyn TypeAdapter> {
        self.adapters.get(&normalize_tag(tag)).map(|adapter| &**adapter)
    }

    /// Number of registered adapters
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Check if no adapter is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Upper;

    impl TypeAdapter for Upper {
        fn construct(&self, content: Value) -> Result<Value, AdapterError> {
            let text = content.as_str().ok_or("expected string")?;
            Ok(Value::from(text.to_uppercase()))
        }

        fn represent(&self, value: &Value) -> Result<Value, AdapterError> {
            let text = value.as_str().ok_or("expected string")?;
            Ok(Value::from(text.to_lowercase()))
        }
    }

    #[test]
    fn registry_lookup_ignores_bang() {
        let registry = TypeRegistry::new().with("!upper", Upper);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("upper").is_some());
        assert!(registry.get("!upper").is_some());
        assert!(registry.get("lower").is_none());
    }

    #[test]
    fn adapter_errors_carry_message() {
        let registry = TypeRegistry::new().with("upper", Upper);
        let err = registry
            .get("upper")
            .unwrap()
            .construct(Value::from(1))
            .unwrap_err();
        assert_eq!(err.to_string(), "expected string");
    }
}
