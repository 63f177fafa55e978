//! Versioning strategies
//!
//! A [`Versioning`] tells the updater which version each document is at.
//! [`ManualVersioning`] is handed both ids up front; [`AutomaticVersioning`]
//! reads them from a route inside the documents and writes the new id back
//! once the user document has been updated.

use std::fmt::Debug;

use cfgshift_document::{Route, Section};
use cfgshift_version::{Pattern, Version, VersionResult};
use serde_yaml::Value;

/// Source of the user and default document versions
pub trait Versioning: Debug + Send + Sync {
    /// Version of the user document, `None` if it cannot be determined
    fn user_version(&self, user: &Section) -> Option<Version>;

    /// Version of the default document, `None` if it carries none
    ///
    /// # Errors
    /// Returns error if a version is present but does not match the pattern
    fn default_version(&self, default: &Section) -> VersionResult<Option<Version>>;

    /// Version assumed for user documents without a readable one
    fn oldest_version(&self) -> Version;

    /// Record `version` in the updated user document
    fn persist(&self, user: &mut Section, version: &Version);
}

/// Versions fixed when the strategy is built
#[derive(Debug, Clone)]
pub struct ManualVersioning {
    pattern: Pattern,
    user: Option<Version>,
    default: Version,
}

impl ManualVersioning {
    /// Create strategy from version ids
    ///
    /// `user_id` may be absent (unknown), in which case the user document is
    /// treated as the pattern's oldest version.
    ///
    /// # Errors
    /// Returns [`VersionError::Parse`](cfgshift_version::VersionError::Parse)
    /// if an id does not match `pattern`
    pub fn new(pattern: Pattern, user_id: Option<&str>, default_id: &str) -> VersionResult<Self> {
        Ok(Self {
            user: user_id.map(|id| pattern.version(id)).transpose()?,
            default: pattern.version(default_id)?,
            pattern,
        })
    }
}

impl Versioning for ManualVersioning {
    fn user_version(&self, _user: &Section) -> Option<Version> {
        self.user.clone()
    }

    fn default_version(&self, _default: &Section) -> VersionResult<Option<Version>> {
        Ok(Some(self.default.clone()))
    }

    fn oldest_version(&self) -> Version {
        self.pattern.oldest()
    }

    fn persist(&self, _user: &mut Section, _version: &Version) {}
}

/// Version ids stored as strings at a route inside the documents
#[derive(Debug, Clone)]
pub struct AutomaticVersioning {
    pattern: Pattern,
    route: Route,
}

impl AutomaticVersioning {
    /// Create strategy reading ids at `route`
    #[inline]
    #[must_use]
    pub fn new(pattern: Pattern, route: Route) -> Self {
        Self { pattern, route }
    }

    /// Get route of the version id
    #[inline]
    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    fn id<'a>(&self, section: &'a Section) -> Option<&'a str> {
        section.get_value(&self.route)?.as_str()
    }
}

impl Versioning for AutomaticVersioning {
    fn user_version(&self, user: &Section) -> Option<Version> {
        let Some(id) = self.id(user) else {
            if user.get(&self.route).is_some() {
                tracing::warn!(route = %self.route, "user version is not a string");
            }
            return None;
        };
        match self.pattern.version(id) {
            Ok(version) => Some(version),
            Err(err) => {
                tracing::warn!(route = %self.route, error = %err, "unreadable user version");
                None
            }
        }
    }

    fn default_version(&self, default: &Section) -> VersionResult<Option<Version>> {
        self.id(default)
            .map(|id| self.pattern.version(id))
            .transpose()
    }

    fn oldest_version(&self) -> Version {
        self.pattern.oldest()
    }

    fn persist(&self, user: &mut Section, version: &Version) {
        user.set(&self.route, Value::String(version.as_id()));
    }
}
