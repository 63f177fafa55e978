//! Routes for addressing blocks within a document
//!
//! Provides [`Route`], an immutable, non-empty sequence of keys leading from a
//! section to a block at any depth.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde_yaml::Value;

/// Key of a mapping entry
///
/// Keys are opaque: with the default [`KeyFormat`](crate::KeyFormat) every
/// scalar key is a string, but documents may keep numbers, booleans or any
/// other YAML value as keys.
pub type Key = Value;

/// Default separator used by [`FromStr`] and [`Display`].
pub const DEFAULT_SEPARATOR: char = '.';

/// Route within a section tree
///
/// # Invariants
/// A route always holds at least one key. Equality and hashing are structural
/// over the keys, so `Route::single("a")` and `"a".parse::<Route>()` are the
/// same route.
///
/// # Examples
/// - `["server", "port"]` → `server.port`
/// - `"a/b"` split on `/` → `["a", "b"]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route(Vec<Key>);

impl Route {
    /// Create route from keys
    ///
    /// # Errors
    /// Returns [`RouteError::Empty`] if no keys are given
    pub fn from_keys<I, K>(keys: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        let keys: Vec<Key> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Err(RouteError::Empty);
        }
        Ok(Self(keys))
    }

    /// Create route from a single key
    #[inline]
    #[must_use]
    pub fn single(key: impl Into<Key>) -> Self {
        Self(vec![key.into()])
    }

    /// Split `text` on `separator`, every part becoming a string key
    ///
    /// Empty parts are kept as empty-string keys; there is no escaping, pick a
    /// separator that does not occur in the keys instead.
    ///
    /// # Errors
    /// Returns [`RouteError::Empty`] if `text` is empty
    pub fn from_string(text: &str, separator: char) -> Result<Self, RouteError> {
        if text.is_empty() {
            return Err(RouteError::Empty);
        }
        Ok(Self(
            text.split(separator)
                .map(|part| Value::String(part.to_string()))
                .collect(),
        ))
    }

    /// Get route keys
    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    /// Get number of keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with collections
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Get key at `index`
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Key> {
        self.0.get(index)
    }

    /// First key
    #[inline]
    #[must_use]
    pub fn first(&self) -> &Key {
        &self.0[0]
    }

    /// Last key
    #[inline]
    #[must_use]
    pub fn last(&self) -> &Key {
        &self.0[self.0.len() - 1]
    }

    /// Append a key, returning new route
    #[inline]
    #[must_use]
    pub fn add(&self, key: impl Into<Key>) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.into());
        Self(keys)
    }

    /// Route without its last key
    ///
    /// `None` for single-key routes: their parent is the section the route is
    /// resolved against, which has no route of its own here.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.len() == 1 {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Check if this route is a strict prefix of another
    #[inline]
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.0.len() < other.0.len() && self.0 == other.0[..self.0.len()]
    }

    /// Join keys with custom separator
    #[must_use]
    pub fn join(&self, separator: char) -> String {
        let mut out = String::new();
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(separator);
            }
            out.push_str(&key_to_string(key));
        }
        out
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(DEFAULT_SEPARATOR))
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s, DEFAULT_SEPARATOR)
    }
}

/// Plain-text form of a key, as used in route strings
#[must_use]
pub fn key_to_string(key: &Key) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Errors related to routes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Route without keys
    #[error("route must contain at least one key")]
    Empty,
}
