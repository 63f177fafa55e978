//! Replay of recorded route moves
//!
//! Every version after the user's, up to and including the default's, may
//! record moves. They are replayed version by version on the user tree so
//! values land where the default document now expects them.
//!
//! Within one version a move whose target is itself still waiting to move
//! resolves that target first. Each move is taken off the pending list before
//! it recurses, so cycles terminate: `{x → y, y → x}` swaps the two values.

use cfgshift_document::{Block, Route, Section};
use cfgshift_version::Version;

use crate::error::UpdateResult;
use crate::settings::{RelocationMap, Relocations};

/// Applies relocations to a user tree
#[derive(Debug)]
pub struct Relocator<'a> {
    root: &'a mut Section,
    user: &'a Version,
    default: &'a Version,
}

impl<'a> Relocator<'a> {
    /// Create relocator moving `root` from `user` to `default`
    #[inline]
    #[must_use]
    pub fn new(root: &'a mut Section, user: &'a Version, default: &'a Version) -> Self {
        Self {
            root,
            user,
            default,
        }
    }

    /// Replay the moves of every version in `(user, default]`
    ///
    /// Returns the number of blocks moved. Moves whose source holds nothing
    /// are skipped.
    ///
    /// # Errors
    /// Returns [`VersionError::PatternMismatch`](cfgshift_version::VersionError)
    /// if the versions use different patterns
    pub fn apply(&mut self, relocations: &Relocations) -> UpdateResult<usize> {
        if self.user.compare(self.default)?.is_ge() {
            return Ok(0);
        }
        let mut moved = 0;
        let mut current = self.user.next()?;
        loop {
            let id = current.as_id();
            if let Some(map) = relocations.for_version(&id) {
                tracing::debug!(version = %id, moves = map.len(), "applying relocations");
                moved += self.apply_map(map);
            }
            if current >= *self.default {
                break;
            }
            current = current.next()?;
        }
        Ok(moved)
    }

    fn apply_map(&mut self, map: &RelocationMap) -> usize {
        let mut pending = map.clone();
        let mut moved = 0;
        while let Some((from, to)) = pending.shift_remove_index(0) {
            moved += self.relocate(&mut pending, &from, to);
        }
        moved
    }

    fn relocate(&mut self, pending: &mut RelocationMap, from: &Route, to: Route) -> usize {
        let Some(block) = self.detach(from) else {
            tracing::trace!(from = %from, to = %to, "nothing to relocate");
            return 0;
        };
        let mut moved = 0;
        if let Some(next) = pending.shift_remove(&to) {
            moved += self.relocate(pending, &to, next);
        }
        tracing::trace!(from = %from, to = %to, "relocated");
        self.root.set_block(&to, block);
        moved + 1
    }

    /// Remove the block at `route`, then any parent section left empty
    fn detach(&mut self, route: &Route) -> Option<Block> {
        let block = self.root.remove(route)?;
        let mut parent = route.parent();
        while let Some(current) = parent {
            if !self.root.get_section(&current).is_some_and(|s| s.is_empty(false)) {
                break;
            }
            self.root.remove(&current);
            parent = current.parent();
        }
        Some(block)
    }
}
