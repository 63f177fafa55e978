//! Update configuration
//!
//! [`UpdaterSettings`] collects everything one update run needs: how versions
//! are found, which relocations to replay, how merge conflicts resolve and
//! which user-only blocks survive pruning.

use std::sync::Arc;

use cfgshift_document::Route;
use indexmap::{IndexMap, IndexSet};

use crate::error::UpdateResult;
use crate::merge_rule::{MergeRule, MergeRules};
use crate::versioning::Versioning;

/// Relocations applied when a user document passes a version
pub type RelocationMap = IndexMap<Route, Route>;

/// Route moves recorded per version id
///
/// Moves of one version are replayed in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relocations {
    versions: IndexMap<String, RelocationMap>,
}

impl Relocations {
    /// Create empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `from` moved to `to` in version `version_id`
    ///
    /// A second move of the same `from` in the same version replaces the first.
    pub fn add(&mut self, version_id: impl Into<String>, from: Route, to: Route) -> &mut Self {
        self.versions
            .entry(version_id.into())
            .or_default()
            .insert(from, to);
        self
    }

    /// Builder form of [`Relocations::add`]
    #[must_use]
    pub fn with(mut self, version_id: impl Into<String>, from: Route, to: Route) -> Self {
        self.add(version_id, from, to);
        self
    }

    /// Moves recorded for `version_id`
    #[inline]
    #[must_use]
    pub fn for_version(&self, version_id: &str) -> Option<&RelocationMap> {
        self.versions.get(version_id)
    }

    /// Number of versions with recorded moves
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Check if no moves are recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Load a table written as YAML
    ///
    /// ```yaml
    /// "1.3":
    ///   x: g
    ///   server.port: net.port
    /// ```
    ///
    /// Version ids are read as the key text, so `1.10:` stays `"1.10"` quoted
    /// or not; routes are split on `separator`.
    ///
    /// # Errors
    /// Returns [`UpdateError::Yaml`](crate::UpdateError::Yaml) if the text is
    /// not such a table, or [`UpdateError::Route`](crate::UpdateError::Route)
    /// for an empty route
    pub fn from_yaml(text: &str, separator: char) -> UpdateResult<Self> {
        let raw: Option<IndexMap<String, IndexMap<String, String>>> = serde_yaml::from_str(text)?;
        let mut relocations = Self::new();
        for (version_id, moves) in raw.unwrap_or_default() {
            let map = relocations.versions.entry(version_id).or_default();
            for (from, to) in moves {
                map.insert(
                    Route::from_string(&from, separator)?,
                    Route::from_string(&to, separator)?,
                );
            }
        }
        Ok(relocations)
    }
}

/// Order of entries in merged sections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionSorting {
    /// User order, new default keys appended
    #[default]
    None,
    /// Default document order, user-only survivors last
    SortByDefaults,
}

/// Settings of one update run
#[derive(Debug, Clone, Default)]
pub struct UpdaterSettings {
    versioning: Option<Arc<dyn Versioning>>,
    merge_rules: MergeRules,
    relocations: Relocations,
    keep_routes: IndexSet<Route>,
    ignored_routes: IndexSet<Route>,
    keep_all: bool,
    enable_downgrading: bool,
    option_sorting: OptionSorting,
}

impl UpdaterSettings {
    /// Create settings without versioning (merge only)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set versioning strategy
    #[must_use]
    pub fn with_versioning(mut self, versioning: impl Versioning + 'static) -> Self {
        self.versioning = Some(Arc::new(versioning));
        self
    }

    /// Set merge rules
    #[must_use]
    pub fn with_merge_rules(mut self, merge_rules: MergeRules) -> Self {
        self.merge_rules = merge_rules;
        self
    }

    /// Set a single merge rule
    #[must_use]
    pub fn with_merge_rule(mut self, rule: MergeRule, preserve_user: bool) -> Self {
        self.merge_rules = self.merge_rules.with(rule, preserve_user);
        self
    }

    /// Set relocation table
    #[must_use]
    pub fn with_relocations(mut self, relocations: Relocations) -> Self {
        self.relocations = relocations;
        self
    }

    /// Keep the user block at `route` even if the default lacks it
    #[must_use]
    pub fn with_keep_route(mut self, route: Route) -> Self {
        self.keep_routes.insert(route);
        self
    }

    /// Keep the user blocks at `routes`
    #[must_use]
    pub fn with_keep_routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.keep_routes.extend(routes);
        self
    }

    /// Leave the user block at `route` untouched by the merge
    #[must_use]
    pub fn with_ignored_route(mut self, route: Route) -> Self {
        self.ignored_routes.insert(route);
        self
    }

    /// Keep every user-only block
    #[must_use]
    pub fn with_keep_all(mut self, keep_all: bool) -> Self {
        self.keep_all = keep_all;
        self
    }

    /// Allow user documents newer than the default
    #[must_use]
    pub fn with_downgrading(mut self, enable: bool) -> Self {
        self.enable_downgrading = enable;
        self
    }

    /// Set entry ordering of merged sections
    #[must_use]
    pub fn with_option_sorting(mut self, option_sorting: OptionSorting) -> Self {
        self.option_sorting = option_sorting;
        self
    }

    /// Get versioning strategy
    #[inline]
    #[must_use]
    pub fn versioning(&self) -> Option<&dyn Versioning> {
        self.versioning.as_deref()
    }

    /// Get merge rules
    #[inline]
    #[must_use]
    pub fn merge_rules(&self) -> &MergeRules {
        &self.merge_rules
    }

    /// Get relocation table
    #[inline]
    #[must_use]
    pub fn relocations(&self) -> &Relocations {
        &self.relocations
    }

    /// Get keep routes
    #[inline]
    #[must_use]
    pub fn keep_routes(&self) -> &IndexSet<Route> {
        &self.keep_routes
    }

    /// Check if `route` is a keep route
    #[inline]
    #[must_use]
    pub fn is_kept(&self, route: &Route) -> bool {
        self.keep_routes.contains(route)
    }

    /// Check if `route` is ignored by the merge
    #[inline]
    #[must_use]
    pub fn is_ignored(&self, route: &Route) -> bool {
        self.ignored_routes.contains(route)
    }

    /// Check if every user-only block is kept
    #[inline]
    #[must_use]
    pub fn keep_all(&self) -> bool {
        self.keep_all
    }

    /// Check if downgrading is allowed
    #[inline]
    #[must_use]
    pub fn downgrading_enabled(&self) -> bool {
        self.enable_downgrading
    }

    /// Get entry ordering
    #[inline]
    #[must_use]
    pub fn option_sorting(&self) -> OptionSorting {
        self.option_sorting
    }
}
