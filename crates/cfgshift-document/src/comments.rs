//! Comment storage attached to blocks and nodes

/// Single comment line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comment {
    /// `# text`, stored without the leading hash
    Line(String),

    /// Empty line kept for layout
    Blank,
}

impl Comment {
    /// Create a line comment
    #[inline]
    #[must_use]
    pub fn line(text: impl Into<String>) -> Self {
        Self::Line(text.into())
    }
}

/// Which node of a mapping entry a comment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// The key node
    Key,
    /// The value node
    Value,
}

/// Where a comment sits relative to its node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Lines above the node
    Before,
    /// Same line, after the node
    Inline,
    /// Lines below the node (and its children)
    After,
}

/// Comments around one node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentSet {
    /// Lines above
    pub before: Vec<Comment>,
    /// Trailing same-line comments
    pub inline: Vec<Comment>,
    /// Lines below
    pub after: Vec<Comment>,
}

impl CommentSet {
    /// Slot at `position`
    #[inline]
    #[must_use]
    pub fn get(&self, position: Position) -> &[Comment] {
        match position {
            Position::Before => &self.before,
            Position::Inline => &self.inline,
            Position::After => &self.after,
        }
    }

    /// Mutable slot at `position`
    #[inline]
    pub fn get_mut(&mut self, position: Position) -> &mut Vec<Comment> {
        match position {
            Position::Before => &mut self.before,
            Position::Inline => &mut self.inline,
            Position::After => &mut self.after,
        }
    }

    /// True if no slot holds a comment
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.inline.is_empty() && self.after.is_empty()
    }
}

/// Six-slot comment store of a block: before/inline/after for key and value
///
/// Plain value data. Cloning a block copies its comments, so editing one copy
/// never shows through another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
    key: CommentSet,
    value: CommentSet,
}

impl Comments {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the comment sets of a key node and a value node
    #[inline]
    #[must_use]
    pub fn from_sets(key: CommentSet, value: CommentSet) -> Self {
        Self { key, value }
    }

    /// Comments of one node
    #[inline]
    #[must_use]
    pub fn of(&self, role: NodeRole) -> &CommentSet {
        match role {
            NodeRole::Key => &self.key,
            NodeRole::Value => &self.value,
        }
    }

    /// Mutable comments of one node
    #[inline]
    pub fn of_mut(&mut self, role: NodeRole) -> &mut CommentSet {
        match role {
            NodeRole::Key => &mut self.key,
            NodeRole::Value => &mut self.value,
        }
    }

    /// Comments in one slot
    #[inline]
    #[must_use]
    pub fn get(&self, role: NodeRole, position: Position) -> &[Comment] {
        self.of(role).get(position)
    }

    /// Replace one slot
    pub fn set(&mut self, role: NodeRole, position: Position, comments: Vec<Comment>) {
        *self.of_mut(role).get_mut(position) = comments;
    }

    /// Append to one slot
    pub fn add(&mut self, role: NodeRole, position: Position, comment: Comment) {
        self.of_mut(role).get_mut(position).push(comment);
    }

    /// Clear one slot
    pub fn remove(&mut self, role: NodeRole, position: Position) {
        self.of_mut(role).get_mut(position).clear();
    }

    /// True if every slot is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && self.value.is_empty()
    }

    /// Split into key and value sets
    #[inline]
    #[must_use]
    pub fn into_sets(self) -> (CommentSet, CommentSet) {
        (self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_slots_are_independent() {
        let mut comments = Comments::new();
        comments.add(NodeRole::Key, Position::Before, Comment::line("header"));
        comments.add(NodeRole::Value, Position::Inline, Comment::line("units: s"));

        assert_eq!(
            comments.get(NodeRole::Key, Position::Before),
            &[Comment::line("header")]
        );
        assert!(comments.get(NodeRole::Key, Position::Inline).is_empty());
        assert_eq!(
            comments.get(NodeRole::Value, Position::Inline),
            &[Comment::line("units: s")]
        );
    }

    #[test]
    fn comments_set_and_remove() {
        let mut comments = Comments::new();
        comments.set(
            NodeRole::Value,
            Position::After,
            vec![Comment::Blank, Comment::line("end")],
        );
        assert_eq!(comments.get(NodeRole::Value, Position::After).len(), 2);

        comments.remove(NodeRole::Value, Position::After);
        assert!(comments.is_empty());
    }

    #[test]
    fn comments_clone_is_detached() {
        let mut original = Comments::new();
        original.add(NodeRole::Key, Position::Before, Comment::line("a"));

        let mut copy = original.clone();
        copy.add(NodeRole::Key, Position::Before, Comment::line("b"));

        assert_eq!(original.get(NodeRole::Key, Position::Before).len(), 1);
        assert_eq!(copy.get(NodeRole::Key, Position::Before).len(), 2);
    }
}
