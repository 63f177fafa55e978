//! Default/user merge
//!
//! Walks the default tree and brings the user tree to its shape:
//! - keys only in the default are copied over
//! - sections present on both sides are merged recursively
//! - other pairs are settled by [`MergeRules`](crate::MergeRules)
//! - keys only in the user tree are pruned unless kept
//!
//! Copies go through [`Codec::duplicate`] with the user document's settings,
//! so they share nothing with the default tree.

use cfgshift_document::{Block, Codec, DocumentSettings, Key, Section};

use crate::error::UpdateResult;
use crate::merge_rule::MergeRule;
use crate::settings::{OptionSorting, UpdaterSettings};

/// Counts of what a merge changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Blocks copied from the default where the user had none
    pub added: usize,
    /// User blocks replaced by the default's
    pub replaced: usize,
    /// User-only blocks removed
    pub pruned: usize,
}

/// Recursive merger of a default section into a user section
#[derive(Debug, Clone, Copy)]
pub struct Merger<'a> {
    codec: Codec<'a>,
    settings: &'a UpdaterSettings,
}

impl<'a> Merger<'a> {
    /// Create merger cloning with `document` settings (those of the user
    /// document)
    #[inline]
    #[must_use]
    pub fn new(document: &'a DocumentSettings, settings: &'a UpdaterSettings) -> Self {
        Self {
            codec: Codec::new(document),
            settings,
        }
    }

    /// Merge `default` into `user`
    ///
    /// # Errors
    /// Returns document errors raised while cloning default blocks (custom
    /// type adapters)
    pub fn merge(&self, user: &mut Section, default: &Section) -> UpdateResult<MergeSummary> {
        let mut summary = MergeSummary::default();
        self.merge_section(user, default, &mut summary)?;
        Ok(summary)
    }

    fn merge_section(
        &self,
        user: &mut Section,
        default: &Section,
        summary: &mut MergeSummary,
    ) -> UpdateResult<()> {
        for (key, default_block) in default.entries() {
            let user_is_section = user.get_direct(key).map(Block::is_section);
            if user_is_section.is_some() && self.settings.is_ignored(&user.child_route(key)) {
                tracing::trace!(route = %user.child_route(key), "ignored by merge");
                continue;
            }
            match (user_is_section, default_block) {
                (None, _) => {
                    user.insert(key.clone(), self.codec.duplicate(default_block)?);
                    summary.added += 1;
                }
                (Some(true), Block::Section(default_section)) => {
                    if let Some(Block::Section(user_section)) = user.get_direct_mut(key) {
                        self.merge_section(user_section, default_section, summary)?;
                    }
                }
                (Some(user_is_section), _) => {
                    let preserve = MergeRule::of(user_is_section, default_block.is_section())
                        .map_or(true, |rule| self.settings.merge_rules().preserve_user(rule));
                    if !preserve {
                        user.insert(key.clone(), self.codec.duplicate(default_block)?);
                        summary.replaced += 1;
                    }
                }
            }
        }

        if !self.settings.keep_all() {
            let view: &Section = user;
            let pruned: Vec<Key> = view
                .entries()
                .filter(|(key, block)| {
                    default.get_direct(key).is_none() && !self.keeps(view, key, block)
                })
                .map(|(key, _)| key.clone())
                .collect();
            for key in pruned {
                tracing::debug!(route = %user.child_route(&key), "pruned user-only block");
                user.remove_direct(&key);
                summary.pruned += 1;
            }
        }

        if self.settings.option_sorting() == OptionSorting::SortByDefaults {
            user.reorder(default.keys());
        }
        Ok(())
    }

    /// User-only block survives pruning: it holds a kept block, lies on the
    /// way to a keep route, or is ignored
    fn keeps(&self, user: &Section, key: &Key, block: &Block) -> bool {
        if holds_kept(block) {
            return true;
        }
        let route = user.child_route(key);
        self.settings.is_ignored(&route)
            || self
                .settings
                .keep_routes()
                .iter()
                .any(|kept| *kept == route || route.is_ancestor_of(kept))
    }
}

fn holds_kept(block: &Block) -> bool {
    block.is_kept()
        || block
            .as_section()
            .is_some_and(|section| section.entries().any(|(_, child)| holds_kept(child)))
}
