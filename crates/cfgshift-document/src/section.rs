//! Sections: ordered key → block mappings forming the document tree
//!
//! Every section knows its absolute [`Route`] from the document root (`None`
//! for the root itself and for sections not yet inserted anywhere). Parents
//! are reached by resolving [`Route::parent`] against the root, not through
//! back-pointers.

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

use crate::block::Block;
use crate::comments::Comments;
use crate::route::{Key, Route};

/// Ordered mapping of keys to blocks
///
/// # Invariants
/// - Insertion order of `entries` is the serialization order.
/// - Every nested section's route equals this section's route plus its key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    entries: IndexMap<Key, Block>,
    route: Option<Route>,
    comments: Comments,
    pub(crate) keep: bool,
}

impl Section {
    /// Create empty root section
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn at(route: Route) -> Self {
        Self {
            route: Some(route),
            ..Self::default()
        }
    }

    /// Absolute route of this section; `None` at the root
    #[inline]
    #[must_use]
    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Key under which this section is stored in its parent
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&Key> {
        self.route.as_ref().map(Route::last)
    }

    /// Check if section is a root (or not attached to any tree)
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.route.is_none()
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

    /// Number of direct entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check emptiness
    ///
    /// Shallow: no direct entries. Deep: no terminal anywhere below, so a
    /// section holding only empty sections counts as empty.
    #[must_use]
    pub fn is_empty(&self, deep: bool) -> bool {
        if !deep {
            return self.entries.is_empty();
        }
        self.entries
            .values()
            .all(|block| matches!(block, Block::Section(section) if section.is_empty(true)))
    }

    /// Direct keys in insertion order
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    /// Direct entries in insertion order
    #[inline]
    pub fn entries(&self) -> impl Iterator<Item = (&Key, &Block)> {
        self.entries.iter()
    }

    /// Routes relative to this section
    ///
    /// With `deep`, nested sections are listed followed by their contents.
    #[must_use]
    pub fn routes(&self, deep: bool) -> Vec<Route> {
        let mut out = Vec::new();
        self.collect_routes(None, deep, &mut out);
        out
    }

    fn collect_routes(&self, prefix: Option<&Route>, deep: bool, out: &mut Vec<Route>) {
        for (key, block) in &self.entries {
            let route = join_route(prefix, key);
            out.push(route.clone());
            if let (true, Block::Section(section)) = (deep, block) {
                section.collect_routes(Some(&route), deep, out);
            }
        }
    }

    /// Absolute route a direct child stored under `key` has
    #[inline]
    #[must_use]
    pub fn child_route(&self, key: &Key) -> Route {
        join_route(self.route.as_ref(), key)
    }

    /// Direct child block
    #[inline]
    #[must_use]
    pub fn get_direct(&self, key: &Key) -> Option<&Block> {
        self.entries.get(key)
    }

    /// Mutable direct child block
    #[inline]
    pub fn get_direct_mut(&mut self, key: &Key) -> Option<&mut Block> {
        self.entries.get_mut(key)
    }

    /// Block at `route`, resolved relative to this section
    ///
    /// `None` when any intermediate hop is missing or not a section.
    #[must_use]
    pub fn get(&self, route: &Route) -> Option<&Block> {
        self.get_parent(route)?.entries.get(route.last())
    }

    /// Mutable block at `route`
    pub fn get_mut(&mut self, route: &Route) -> Option<&mut Block> {
        self.get_parent_mut(route)?.entries.get_mut(route.last())
    }

    /// Section at `route`
    #[must_use]
    pub fn get_section(&self, route: &Route) -> Option<&Section> {
        self.get(route)?.as_section()
    }

    /// Terminal value at `route`
    #[must_use]
    pub fn get_value(&self, route: &Route) -> Option<&Value> {
        self.get(route)?.value()
    }

    /// Section that holds (or would hold) the block at `route`
    #[must_use]
    pub fn get_parent(&self, route: &Route) -> Option<&Section> {
        let mut current = self;
        for key in &route.keys()[..route.len() - 1] {
            current = current.entries.get(key)?.as_section()?;
        }
        Some(current)
    }

    /// Mutable parent section of `route`
    pub fn get_parent_mut(&mut self, route: &Route) -> Option<&mut Section> {
        let mut current = self;
        for key in &route.keys()[..route.len() - 1] {
            current = current.entries.get_mut(key)?.as_section_mut()?;
        }
        Some(current)
    }

    /// Set a plain value at `route`
    ///
    /// Intermediate sections are created as needed (terminals in the way are
    /// replaced). An existing block at `route` is overwritten in place and its
    /// comments are carried over to the new block. Mappings become sections.
    pub fn set(&mut self, route: &Route, value: impl Into<Value>) -> Option<Block> {
        let comments = self
            .get(route)
            .map(|block| block.comments().clone())
            .unwrap_or_default();
        let block = Block::from_value(value.into()).with_comments(comments);
        self.set_block(route, block)
    }

    /// Store `block` at `route`, creating intermediate sections
    ///
    /// Returns the block previously stored there.
    pub fn set_block(&mut self, route: &Route, block: Block) -> Option<Block> {
        let mut current = self;
        for key in &route.keys()[..route.len() - 1] {
            current = current.section_entry(key);
        }
        current.insert(route.last().clone(), block)
    }

    /// Section at `route`, created (or replacing a terminal) if needed
    pub fn create_section(&mut self, route: &Route) -> &mut Section {
        let mut current = self;
        for key in route.keys() {
            current = current.section_entry(key);
        }
        current
    }

    /// Insert a direct child, keeping the position of an existing key
    pub fn insert(&mut self, key: Key, mut block: Block) -> Option<Block> {
        block.adapt(self.child_route(&key));
        self.entries.insert(key, block)
    }

    /// Remove a direct child, preserving the order of the others
    pub fn remove_direct(&mut self, key: &Key) -> Option<Block> {
        self.entries.shift_remove(key)
    }

    /// Remove the block at `route`
    pub fn remove(&mut self, route: &Route) -> Option<Block> {
        self.get_parent_mut(route)?.remove_direct(route.last())
    }

    /// Reorder entries: keys yielded by `order` first, in that order, then the
    /// remaining entries in their current order
    pub fn reorder<'a>(&mut self, order: impl IntoIterator<Item = &'a Key>) {
        let mut remaining = std::mem::take(&mut self.entries);
        let mut ordered = IndexMap::with_capacity(remaining.len());
        for key in order {
            if let Some((key, block)) = remaining.shift_remove_entry(key) {
                ordered.insert(key, block);
            }
        }
        ordered.extend(remaining);
        self.entries = ordered;
    }

    /// Plain mapping of this section, comments dropped
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut mapping = Mapping::with_capacity(self.entries.len());
        for (key, block) in &self.entries {
            mapping.insert(key.clone(), block.to_value());
        }
        Value::Mapping(mapping)
    }

    /// Re-root this section and everything below it
    pub(crate) fn adapt(&mut self, route: Option<Route>) {
        self.route = route;
        for (key, block) in &mut self.entries {
            if let Block::Section(child) = block {
                child.adapt(Some(join_route(self.route.as_ref(), key)));
            }
        }
    }

    fn section_entry(&mut self, key: &Key) -> &mut Section {
        let route = self.child_route(key);
        let slot = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Block::Section(Section::at(route.clone())));
        loop {
            match slot {
                Block::Section(section) => return section,
                Block::Terminal(terminal) => {
                    let comments = std::mem::take(terminal.comments_mut());
                    let mut section = Section::at(route.clone());
                    section.comments = comments;
                    *slot = Block::Section(section);
                }
            }
        }
    }

    /// Clear the keep flag of this section and every block below it
    pub fn clear_keep(&mut self) {
        self.keep = false;
        for block in self.entries.values_mut() {
            match block {
                Block::Section(child) => child.clear_keep(),
                Block::Terminal(_) => block.set_keep(false),
            }
        }
    }
}

fn join_route(prefix: Option<&Route>, key: &Key) -> Route {
    match prefix {
        Some(route) => route.add(key.clone()),
        None => Route::single(key.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::{Comment, NodeRole, Position};

    fn route(text: &str) -> Route {
        text.parse().unwrap()
    }

    fn sample() -> Section {
        let value: Value = serde_yaml::from_str(
            "server:\n  host: localhost\n  port: 8080\ndebug: true\nlist: [1, 2]\n",
        )
        .unwrap();
        match Block::from_value(value) {
            Block::Section(section) => section,
            Block::Terminal(_) => unreachable!(),
        }
    }

    #[test]
    fn get_multi_level() {
        let section = sample();
        assert_eq!(
            section.get_value(&route("server.host")),
            Some(&Value::from("localhost"))
        );
        assert_eq!(section.get_value(&route("debug")), Some(&Value::from(true)));
        assert!(section.get(&route("server.missing")).is_none());
    }

    #[test]
    fn get_through_terminal_is_absent() {
        let section = sample();
        assert!(section.get(&route("debug.nested")).is_none());
        assert!(section.get_parent(&route("debug.nested")).is_none());
    }

    #[test]
    fn nested_sections_know_their_route() {
        let section = sample();
        let server = section.get_section(&route("server")).unwrap();
        assert_eq!(server.route(), Some(&route("server")));
        assert_eq!(server.name(), Some(&Value::from("server")));
        assert!(!server.is_root());
        assert!(section.is_root());
    }

    #[test]
    fn set_creates_intermediate_sections() {
        let mut section = Section::new();
        section.set(&route("a.b.c"), 1);

        let b = section.get_section(&route("a.b")).unwrap();
        assert_eq!(b.route(), Some(&route("a.b")));
        assert_eq!(section.get_value(&route("a.b.c")), Some(&Value::from(1)));
    }

    #[test]
    fn set_replaces_terminal_on_the_way() {
        let mut section = sample();
        section.set(&route("debug.level"), "trace");
        assert_eq!(
            section.get_value(&route("debug.level")),
            Some(&Value::from("trace"))
        );
    }

    #[test]
    fn set_keeps_position_and_comments() {
        let mut section = sample();
        section
            .get_mut(&route("debug"))
            .unwrap()
            .comments_mut()
            .add(NodeRole::Key, Position::Before, Comment::line("toggle"));

        section.set(&route("debug"), false);

        let keys: Vec<_> = section.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![Value::from("server"), Value::from("debug"), Value::from("list")]
        );
        let block = section.get(&route("debug")).unwrap();
        assert_eq!(block.value(), Some(&Value::from(false)));
        assert_eq!(
            block.comments().get(NodeRole::Key, Position::Before),
            &[Comment::line("toggle")]
        );
    }

    #[test]
    fn set_mapping_value_builds_section() {
        let mut section = Section::new();
        let value: Value = serde_yaml::from_str("x: {y: 1}").unwrap();
        section.set(&route("root"), value);
        let nested = section.get_section(&route("root.x")).unwrap();
        assert_eq!(nested.route(), Some(&route("root.x")));
    }

    #[test]
    fn insert_re_roots_moved_sections() {
        let mut section = sample();
        let server = section.remove(&route("server")).unwrap();
        section.set_block(&route("moved.here"), server);

        let moved = section.get_section(&route("moved.here")).unwrap();
        assert_eq!(moved.route(), Some(&route("moved.here")));
        assert_eq!(
            section.get_value(&route("moved.here.port")),
            Some(&Value::from(8080))
        );
    }

    #[test]
    fn remove_preserves_order() {
        let mut section = sample();
        assert!(section.remove(&route("debug")).is_some());
        let keys: Vec<_> = section.keys().cloned().collect();
        assert_eq!(keys, vec![Value::from("server"), Value::from("list")]);
        assert!(section.remove(&route("debug")).is_none());
    }

    #[test]
    fn is_empty_shallow_and_deep() {
        let mut section = Section::new();
        assert!(section.is_empty(false));
        section.create_section(&route("a.b"));
        assert!(!section.is_empty(false));
        assert!(section.is_empty(true));
        section.set(&route("a.c"), 1);
        assert!(!section.is_empty(true));
    }

    #[test]
    fn routes_shallow_and_deep() {
        let section = sample();
        assert_eq!(section.routes(false).len(), 3);
        let deep: Vec<String> = section.routes(true).iter().map(Route::to_string).collect();
        assert_eq!(
            deep,
            vec!["server", "server.host", "server.port", "debug", "list"]
        );
    }

    #[test]
    fn reorder_puts_listed_keys_first() {
        let mut section = sample();
        let order = [Value::from("list"), Value::from("missing"), Value::from("server")];
        section.reorder(order.iter());
        let keys: Vec<_> = section.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![Value::from("list"), Value::from("server"), Value::from("debug")]
        );
    }

    #[test]
    fn to_value_round_trip() {
        let section = sample();
        let expected: Value = serde_yaml::from_str(
            "server:\n  host: localhost\n  port: 8080\ndebug: true\nlist: [1, 2]\n",
        )
        .unwrap();
        assert_eq!(section.to_value(), expected);
    }

    #[test]
    fn clear_keep_reaches_every_block() {
        let mut section = sample();
        section.get_mut(&route("server")).unwrap().set_keep(true);
        section.get_mut(&route("server.port")).unwrap().set_keep(true);
        section.get_mut(&route("debug")).unwrap().set_keep(true);

        section.clear_keep();

        for route in section.routes(true) {
            assert!(!section.get(&route).unwrap().is_kept(), "{route} still kept");
        }
    }
}
