//! Update engine
//!
//! Folds a user document forward onto a new default document.

use std::cmp::Ordering;

use cfgshift_document::Document;
use cfgshift_version::Version;

use crate::error::{UpdateError, UpdateResult};
use crate::merger::{MergeSummary, Merger};
use crate::relocator::Relocator;
use crate::settings::UpdaterSettings;

/// Progress of an update run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum UpdateStage {
    /// Nothing done yet
    #[default]
    NotStarted,
    /// User and default versions known
    VersionsResolved,
    /// Relocations replayed on the user document
    Relocated,
    /// Default merged into the user document
    Merged,
    /// Default version written to the user document
    VersionPersisted,
    /// Run complete
    Done,
}

/// Outcome of an update run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateReport {
    /// Version the user document was treated as (oldest if unreadable)
    pub user_version: Option<Version>,
    /// Version of the default document
    pub default_version: Option<Version>,
    /// Whether relocations were replayed
    pub relocated: bool,
    /// Blocks moved by relocations
    pub moved: usize,
    /// Whether the user document was newer than the default
    pub downgrade: bool,
    /// Merge counts
    pub merge: MergeSummary,
    /// Last stage reached
    pub stage: UpdateStage,
}

/// Updates user documents with one set of settings
#[derive(Debug, Clone, Copy)]
pub struct Updater<'a> {
    settings: &'a UpdaterSettings,
}

impl<'a> Updater<'a> {
    /// Create updater
    #[inline]
    #[must_use]
    pub fn new(settings: &'a UpdaterSettings) -> Self {
        Self { settings }
    }

    /// Update `user` to `default` with `settings`
    ///
    /// # Errors
    /// See [`Updater::run`]
    pub fn update(
        user: &mut Document,
        default: &Document,
        settings: &UpdaterSettings,
    ) -> UpdateResult<UpdateReport> {
        Updater::new(settings).run(user, default)
    }

    /// Update `user` in place
    ///
    /// # Workflow
    /// 1. Resolve both versions (skipped without versioning)
    /// 2. Mark keep routes and replay relocations, if the user is behind
    /// 3. Merge the default into the user document
    /// 4. Record the default's version in the user document
    /// 5. Clear every keep flag left in the user document
    ///
    /// # Errors
    /// - [`UpdateError::MissingDefaultVersion`] if the default has no version
    /// - [`UpdateError::DowngradeNotAllowed`] if the user is ahead and
    ///   downgrading is disabled
    /// - version errors for unreadable default ids or mixed patterns
    /// - document errors raised while cloning default blocks
    ///
    /// A failed run may leave `user` partially updated.
    pub fn run(&self, user: &mut Document, default: &Document) -> UpdateResult<UpdateReport> {
        let span = tracing::debug_span!("update");
        let _enter = span.enter();
        let mut report = UpdateReport::default();

        if let Some(versioning) = self.settings.versioning() {
            let default_version = versioning
                .default_version(default.root())?
                .ok_or(UpdateError::MissingDefaultVersion)?;
            let user_version = versioning.user_version(user.root()).unwrap_or_else(|| {
                let oldest = versioning.oldest_version();
                tracing::warn!(assumed = %oldest, "user version unknown, assuming oldest");
                oldest
            });
            report.stage = UpdateStage::VersionsResolved;
            tracing::debug!(user = %user_version, default = %default_version, "versions resolved");

            match user_version.compare(&default_version)? {
                Ordering::Greater if !self.settings.downgrading_enabled() => {
                    return Err(UpdateError::DowngradeNotAllowed {
                        user: user_version.as_id(),
                        default: default_version.as_id(),
                    });
                }
                Ordering::Greater => {
                    tracing::debug!("downgrading, relocations skipped");
                    report.downgrade = true;
                }
                Ordering::Equal => tracing::debug!("versions equal, relocations skipped"),
                Ordering::Less => {
                    for route in self.settings.keep_routes() {
                        if let Some(block) = user.root_mut().get_mut(route) {
                            block.set_keep(true);
                        }
                    }
                    report.moved = Relocator::new(user.root_mut(), &user_version, &default_version)
                        .apply(self.settings.relocations())?;
                    report.relocated = true;
                    report.stage = UpdateStage::Relocated;
                    tracing::debug!(moved = report.moved, "relocated");
                }
            }
            report.user_version = Some(user_version);
            report.default_version = Some(default_version);
        }

        let (root, document_settings) = user.parts_mut();
        report.merge = Merger::new(document_settings, self.settings).merge(root, default.root())?;
        report.stage = UpdateStage::Merged;
        tracing::debug!(
            added = report.merge.added,
            replaced = report.merge.replaced,
            pruned = report.merge.pruned,
            "merged"
        );

        if let (Some(versioning), Some(version)) =
            (self.settings.versioning(), report.default_version.as_ref())
        {
            versioning.persist(user.root_mut(), version);
            report.stage = UpdateStage::VersionPersisted;
            tracing::debug!(version = %version, "version persisted");
        }

        user.root_mut().clear_keep();
        report.stage = UpdateStage::Done;
        Ok(report)
    }
}
