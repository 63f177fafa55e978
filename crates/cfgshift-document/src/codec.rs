//! Translation between node graphs and section trees
//!
//! [`Codec::construct_root`] builds a tree from parsed nodes; the `represent_*`
//! functions go the other way. [`Codec::duplicate`] chains both to copy a block
//! from one tree into another: the copy is rebuilt from scratch with the target
//! document's adapters and key format, exactly like freshly loaded data, and
//! shares nothing with its source.

use serde_yaml::{Mapping, Value};

use crate::block::{Block, Terminal};
use crate::comments::{CommentSet, Comments};
use crate::error::{DocumentError, DocumentResult};
use crate::node::{normalize_tag, tagged, Node, NodeKind};
use crate::route::{key_to_string, Key};
use crate::section::Section;
use crate::settings::{DocumentSettings, KeyFormat};

/// Constructor/representer bound to one document's settings
#[derive(Debug, Clone, Copy)]
pub struct Codec<'a> {
    settings: &'a DocumentSettings,
}

impl<'a> Codec<'a> {
    /// Create codec for `settings`
    #[inline]
    #[must_use]
    pub fn new(settings: &'a DocumentSettings) -> Self {
        Self { settings }
    }

    /// Build a root section from the top-level node
    ///
    /// A null node yields an empty root. Comments on the node become the root's
    /// value comments (document header and footer).
    ///
    /// # Errors
    /// Returns [`DocumentError::Malformed`] if the node is neither a mapping
    /// nor null, or an adapter error from tagged content
    pub fn construct_root(&self, node: Node) -> DocumentResult<Section> {
        let mut root = Section::new();
        match node.kind {
            NodeKind::Mapping(entries) if node.tag.is_none() => self.fill(&mut root, entries)?,
            NodeKind::Scalar(Value::Null) => {}
            _ => return Err(DocumentError::malformed("root node is not a mapping")),
        }
        *root.comments_mut() = Comments::from_sets(CommentSet::default(), node.comments);
        Ok(root)
    }

    /// Build the block stored under a key
    ///
    /// Untagged mappings become sections, everything else a terminal.
    ///
    /// # Errors
    /// Returns adapter errors from tagged content
    pub fn construct_block(&self, key_comments: CommentSet, node: Node) -> DocumentResult<Block> {
        let Node {
            kind,
            tag,
            comments,
        } = node;
        let block = match (tag, kind) {
            (None, NodeKind::Mapping(entries)) => {
                let mut section = Section::new();
                self.fill(&mut section, entries)?;
                Block::Section(section)
            }
            (tag, kind) => Block::Terminal(Terminal::new(self.construct_value(Node {
                kind,
                tag,
                comments: CommentSet::default(),
            })?)),
        };
        Ok(block.with_comments(Comments::from_sets(key_comments, comments)))
    }

    fn fill(&self, section: &mut Section, entries: Vec<(Node, Node)>) -> DocumentResult<()> {
        for (mut key_node, value_node) in entries {
            let key_comments = std::mem::take(&mut key_node.comments);
            let key = self.construct_key(key_node)?;
            let block = self.construct_block(key_comments, value_node)?;
            section.insert(key, block);
        }
        Ok(())
    }

    fn construct_key(&self, node: Node) -> DocumentResult<Key> {
        let key = self.construct_value(node)?;
        Ok(match (self.settings.key_format(), key) {
            (KeyFormat::String, scalar @ (Value::Null | Value::Bool(_) | Value::Number(_))) => {
                Value::String(key_to_string(&scalar))
            }
            (_, key) => key,
        })
    }

    /// Build a plain value, running registered adapters on tagged nodes
    ///
    /// # Errors
    /// Returns adapter errors from tagged content
    pub fn construct_value(&self, node: Node) -> DocumentResult<Value> {
        let content = match node.kind {
            NodeKind::Scalar(value) => value,
            NodeKind::Sequence(items) => Value::Sequence(
                items
                    .into_iter()
                    .map(|item| self.construct_value(item))
                    .collect::<DocumentResult<_>>()?,
            ),
            NodeKind::Mapping(entries) => {
                let mut mapping = Mapping::with_capacity(entries.len());
                for (key, value) in entries {
                    mapping.insert(self.construct_key(key)?, self.construct_value(value)?);
                }
                Value::Mapping(mapping)
            }
        };
        let Some(tag) = node.tag else {
            return Ok(content);
        };
        let value = match self.settings.types().get(&tag) {
            Some(adapter) => adapter
                .construct(content)
                .map_err(|source| DocumentError::type_adapter(&tag, source))?,
            None => {
                tracing::trace!(tag = %tag, "no adapter registered, keeping tagged value");
                content
            }
        };
        Ok(tagged(&tag, value))
    }

    /// Represent a section as a mapping node
    ///
    /// Each entry's key comments go on the key node, value comments on the
    /// value node.
    ///
    /// # Errors
    /// Returns adapter errors from custom values
    pub fn represent_section(&self, section: &Section) -> DocumentResult<Node> {
        let mut entries = Vec::with_capacity(section.len());
        for (key, block) in section.entries() {
            let (key_comments, value_comments) = block.comments().clone().into_sets();
            entries.push((
                self.represent_value(key)?.with_comments(key_comments),
                self.represent_block(block)?.with_comments(value_comments),
            ));
        }
        Ok(Node::mapping(entries))
    }

    /// Represent a block's value as a node, without the block's comments
    ///
    /// # Errors
    /// Returns adapter errors from custom values
    pub fn represent_block(&self, block: &Block) -> DocumentResult<Node> {
        match block {
            Block::Section(section) => self.represent_section(section),
            Block::Terminal(terminal) => self.represent_value(terminal.value()),
        }
    }

    /// Represent a plain value, running registered adapters on tagged values
    ///
    /// # Errors
    /// Returns adapter errors from custom values
    pub fn represent_value(&self, value: &Value) -> DocumentResult<Node> {
        Ok(match value {
            Value::Sequence(items) => Node::sequence(
                items
                    .iter()
                    .map(|item| self.represent_value(item))
                    .collect::<DocumentResult<_>>()?,
            ),
            Value::Mapping(mapping) => {
                let mut entries = Vec::with_capacity(mapping.len());
                for (key, value) in mapping {
                    entries.push((self.represent_value(key)?, self.represent_value(value)?));
                }
                Node::mapping(entries)
            }
            Value::Tagged(tagged) => {
                let tag = normalize_tag(&tagged.tag.to_string());
                let content = match self.settings.types().get(&tag) {
                    Some(adapter) => adapter
                        .represent(&tagged.value)
                        .map_err(|source| DocumentError::type_adapter(&tag, source))?,
                    None => tagged.value.clone(),
                };
                self.represent_value(&content)?.with_tag(tag)
            }
            scalar => Node::scalar(scalar.clone()),
        })
    }

    /// Deep copy of `block` through represent → construct
    ///
    /// The copy carries the block's comments but not its keep flag, and is
    /// detached until inserted into a section.
    ///
    /// # Errors
    /// Returns adapter errors from custom values
    pub fn duplicate(&self, block: &Block) -> DocumentResult<Block> {
        let (key_comments, value_comments) = block.comments().clone().into_sets();
        let node = self.represent_block(block)?.with_comments(value_comments);
        let copy = self.construct_block(key_comments, node)?;
        tracing::trace!(section = copy.is_section(), "duplicated block");
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::{Comment, NodeRole, Position};
    use crate::route::Route;

    fn settings() -> DocumentSettings {
        DocumentSettings::new()
    }

    #[test]
    fn construct_root_rejects_scalar() {
        let settings = settings();
        let err = Codec::new(&settings)
            .construct_root(Node::scalar("text"))
            .unwrap_err();
        assert!(matches!(err, DocumentError::Malformed { .. }));
    }

    #[test]
    fn construct_root_accepts_null() {
        let settings = settings();
        let root = Codec::new(&settings)
            .construct_root(Node::scalar(Value::Null))
            .unwrap();
        assert!(root.is_empty(false));
    }

    #[test]
    fn construct_places_comments() {
        let settings = settings();
        let key = Node::scalar("port").with_comments(CommentSet {
            before: vec![Comment::line("listening port")],
            ..CommentSet::default()
        });
        let value = Node::scalar(8080).with_comments(CommentSet {
            inline: vec![Comment::line("tcp")],
            ..CommentSet::default()
        });
        let root = Codec::new(&settings)
            .construct_root(Node::mapping(vec![(key, value)]))
            .unwrap();

        let block = root.get(&Route::single("port")).unwrap();
        assert_eq!(
            block.comments().get(NodeRole::Key, Position::Before),
            &[Comment::line("listening port")]
        );
        assert_eq!(
            block.comments().get(NodeRole::Value, Position::Inline),
            &[Comment::line("tcp")]
        );
    }

    #[test]
    fn string_key_format_stringifies_scalars() {
        let settings = settings();
        let node = Node::mapping(vec![(Node::scalar(1), Node::scalar("one"))]);
        let root = Codec::new(&settings).construct_root(node).unwrap();
        assert!(root.get(&Route::single("1")).is_some());
    }

    #[test]
    fn object_key_format_keeps_scalars() {
        let settings = settings().with_key_format(KeyFormat::Object);
        let node = Node::mapping(vec![(Node::scalar(1), Node::scalar("one"))]);
        let root = Codec::new(&settings).construct_root(node).unwrap();
        assert!(root.get(&Route::single("1")).is_none());
        assert!(root.get(&Route::single(1)).is_some());
    }

    #[test]
    fn represent_keeps_comment_placement() {
        let settings = settings();
        let codec = Codec::new(&settings);
        let mut root = Section::new();
        root.set(&Route::single("a"), 1);
        root.get_mut(&Route::single("a"))
            .unwrap()
            .comments_mut()
            .add(NodeRole::Key, Position::After, Comment::Blank);

        let node = codec.represent_section(&root).unwrap();
        let NodeKind::Mapping(entries) = node.kind else {
            panic!("expected mapping");
        };
        assert_eq!(entries[0].0.comments.after, vec![Comment::Blank]);
        assert!(entries[0].1.comments.is_empty());
    }

    #[test]
    fn duplicate_is_detached_copy() {
        let settings = settings();
        let codec = Codec::new(&settings);
        let value: Value = serde_yaml::from_str("a: {b: [1, 2]}").unwrap();
        let mut original = Block::from_value(value);
        original
            .comments_mut()
            .add(NodeRole::Value, Position::Before, Comment::line("kept"));
        original.set_keep(true);

        let mut copy = codec.duplicate(&original).unwrap();
        assert_eq!(copy.to_value(), original.to_value());
        assert_eq!(copy.comments(), original.comments());
        assert!(!copy.is_kept());

        copy.as_section_mut()
            .unwrap()
            .set(&"a.b".parse().unwrap(), "changed");
        assert_ne!(copy.to_value(), original.to_value());
    }
}
