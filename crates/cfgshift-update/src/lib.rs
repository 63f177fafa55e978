//! cfgshift Update Engine
//!
//! Brings a saved user configuration forward to the shape of a newer default
//! configuration, keeping the user's values and comments.
//!
//! # Core Concepts
//!
//! - [`Versioning`]: Where the user and default versions come from
//! - [`Relocations`]: Route moves recorded per version, replayed by [`Relocator`]
//! - [`MergeRules`]: Which side wins when user and default disagree on a key
//! - [`Merger`]: Recursive default/user merge with pruning of user-only keys
//! - [`Updater`]: Runs the stages in order and reports what happened
//!
//! # Example
//!
//! ```rust
//! use cfgshift_document::{Document, DocumentSettings};
//! use cfgshift_update::{AutomaticVersioning, Relocations, Updater, UpdaterSettings};
//! use cfgshift_version::{Pattern, Segment};
//!
//! let pattern = Pattern::new([Segment::range(1, 99), Segment::literal("."), Segment::range(0, 9)])?;
//! let settings = UpdaterSettings::new()
//!     .with_versioning(AutomaticVersioning::new(pattern, "version".parse()?))
//!     .with_relocations(Relocations::from_yaml("'1.1':\n  port: server.port\n", '.')?);
//!
//! let mut user = Document::load("version: '1.0'\nport: 8080\n", DocumentSettings::new())?;
//! let default = Document::load(
//!     "version: '1.1'\nserver:\n  port: 80\n  host: localhost\n",
//!     DocumentSettings::new(),
//! )?;
//!
//! Updater::update(&mut user, &default, &settings)?;
//! assert_eq!(
//!     user.dump()?,
//!     "version: '1.1'\nserver:\n  port: 8080\n  host: localhost\n"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod merge_rule;
mod merger;
mod relocator;
mod settings;
mod updater;
mod versioning;

pub use error::{UpdateError, UpdateResult};
pub use merge_rule::{MergeRule, MergeRules};
pub use merger::{MergeSummary, Merger};
pub use relocator::Relocator;
pub use settings::{OptionSorting, RelocationMap, Relocations, UpdaterSettings};
pub use updater::{UpdateReport, UpdateStage, Updater};
pub use versioning::{AutomaticVersioning, ManualVersioning, Versioning};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
