//! Documents: a root section plus the settings it was built with

use std::sync::Arc;

use serde_yaml::Value;

use crate::block::Block;
use crate::codec::Codec;
use crate::comments::NodeRole;
use crate::emit;
use crate::error::DocumentResult;
use crate::node::Node;
use crate::route::Route;
use crate::section::Section;
use crate::settings::DocumentSettings;

/// YAML document held as a section tree
///
/// Not synchronized: mutate from one place at a time.
#[derive(Debug, Clone)]
pub struct Document {
    root: Section,
    settings: Arc<DocumentSettings>,
}

impl Document {
    /// Create empty document
    #[must_use]
    pub fn new(settings: DocumentSettings) -> Self {
        Self {
            root: Section::new(),
            settings: Arc::new(settings),
        }
    }

    /// Parse YAML text
    ///
    /// Empty text gives an empty document. Comments around block-style
    /// mapping entries are kept (see [`Node::parse`]).
    ///
    /// # Errors
    /// - [`DocumentError::Yaml`](crate::DocumentError::Yaml) if the text is
    ///   not valid YAML
    /// - [`DocumentError::Malformed`](crate::DocumentError::Malformed) for
    ///   multiple documents or a non-mapping root
    pub fn load(text: &str, settings: DocumentSettings) -> DocumentResult<Self> {
        Self::from_node(Node::parse(text)?, settings)
    }

    /// Build from a plain value
    ///
    /// # Errors
    /// Returns [`DocumentError::Malformed`](crate::DocumentError::Malformed)
    /// for a non-mapping value, or adapter errors
    pub fn from_value(value: Value, settings: DocumentSettings) -> DocumentResult<Self> {
        Self::from_node(Node::from_value(value), settings)
    }

    /// Build from a parsed node graph, keeping its comments
    ///
    /// # Errors
    /// Returns [`DocumentError::Malformed`](crate::DocumentError::Malformed)
    /// for a non-mapping node, or adapter errors
    pub fn from_node(node: Node, settings: DocumentSettings) -> DocumentResult<Self> {
        let root = Codec::new(&settings).construct_root(node)?;
        tracing::debug!(entries = root.len(), "document constructed");
        Ok(Self {
            root,
            settings: Arc::new(settings),
        })
    }

    /// Settings
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &DocumentSettings {
        &self.settings
    }

    /// Root section
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Section {
        &self.root
    }

    /// Mutable root section
    #[inline]
    pub fn root_mut(&mut self) -> &mut Section {
        &mut self.root
    }

    /// Mutable root together with the settings, for code that edits the tree
    /// while cloning blocks into it
    #[inline]
    pub fn parts_mut(&mut self) -> (&mut Section, &DocumentSettings) {
        (&mut self.root, &*self.settings)
    }

    /// Codec bound to this document's settings
    #[inline]
    #[must_use]
    pub fn codec(&self) -> Codec<'_> {
        Codec::new(&self.settings)
    }

    /// Parse a route string with this document's separator
    ///
    /// # Errors
    /// Returns [`DocumentError::Route`](crate::DocumentError::Route) for empty text
    #[inline]
    pub fn route(&self, text: &str) -> DocumentResult<Route> {
        Ok(self.settings.route(text)?)
    }

    /// Block at `route`
    #[inline]
    #[must_use]
    pub fn get(&self, route: &Route) -> Option<&Block> {
        self.root.get(route)
    }

    /// Terminal value at `route`
    #[inline]
    #[must_use]
    pub fn get_value(&self, route: &Route) -> Option<&Value> {
        self.root.get_value(route)
    }

    /// String at `route`
    #[inline]
    #[must_use]
    pub fn get_str(&self, route: &Route) -> Option<&str> {
        self.get_value(route)?.as_str()
    }

    /// Check if a block exists at `route`
    #[inline]
    #[must_use]
    pub fn contains(&self, route: &Route) -> bool {
        self.root.get(route).is_some()
    }

    /// Section holding the block at `route`
    ///
    /// The root for single-key routes.
    #[inline]
    #[must_use]
    pub fn parent_of(&self, route: &Route) -> Option<&Section> {
        self.root.get_parent(route)
    }

    /// Set `value` at `route`, constructed like loaded data
    ///
    /// Comments of a block already at `route` are carried over.
    ///
    /// # Errors
    /// Returns adapter errors from tagged values
    pub fn set(&mut self, route: &Route, value: impl Into<Value>) -> DocumentResult<()> {
        let codec = Codec::new(&self.settings);
        let (key_comments, value_comments) = self
            .root
            .get(route)
            .map(|block| block.comments().clone())
            .unwrap_or_default()
            .into_sets();
        let node = codec.represent_value(&value.into())?.with_comments(value_comments);
        let block = codec.construct_block(key_comments, node)?;
        self.root.set_block(route, block);
        Ok(())
    }

    /// Remove the block at `route`
    #[inline]
    pub fn remove(&mut self, route: &Route) -> Option<Block> {
        self.root.remove(route)
    }

    /// Represent the whole document as a node graph
    ///
    /// # Errors
    /// Returns adapter errors from custom values
    pub fn to_node(&self) -> DocumentResult<Node> {
        let codec = self.codec();
        let comments = self.root.comments().of(NodeRole::Value).clone();
        Ok(codec.represent_section(&self.root)?.with_comments(comments))
    }

    /// Plain value of the document as it would be written
    ///
    /// # Errors
    /// Returns adapter errors from custom values
    pub fn to_value(&self) -> DocumentResult<Value> {
        Ok(self.to_node()?.into_value())
    }

    /// Write the document as block-style YAML, comments included
    ///
    /// # Errors
    /// Returns adapter or YAML errors, or
    /// [`DocumentError::UnrepresentableKey`](crate::DocumentError::UnrepresentableKey) for multi-line keys
    pub fn dump(&self) -> DocumentResult<String> {
        emit::emit(&self.root, &self.settings)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DocumentSettings::default())
    }
}
