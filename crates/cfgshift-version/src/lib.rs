//! cfgshift Versions
//!
//! Comparable, incrementable version ids described by segment patterns.
//!
//! # Core Concepts
//!
//! - [`Pattern`]: Literal text and numeric ranges making up a version id
//! - [`Segment`]: One literal or range of a pattern
//! - [`Version`]: Parsed id with one cursor per range, ordered and steppable
//!
//! # Example
//!
//! ```rust
//! use cfgshift_version::{Pattern, Segment};
//!
//! let pattern = Pattern::new([
//!     Segment::range(1, 100),
//!     Segment::literal("."),
//!     Segment::range(0, 10),
//! ])?;
//! let version = pattern.version("1.10")?;
//! assert_eq!(version.next()?.as_id(), "2.0");
//! # Ok::<(), cfgshift_version::VersionError>(())
//! ```

mod error;
mod pattern;
mod version;

pub use error::{VersionError, VersionResult};
pub use pattern::{Pattern, Segment};
pub use version::Version;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
