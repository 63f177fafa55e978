//! Parsed versions

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use crate::error::{VersionError, VersionResult};
use crate::pattern::{Pattern, Segment};

/// Version of a [`Pattern`]: one cursor per range segment
///
/// Built only through [`Pattern::version`], [`Pattern::oldest`] and
/// [`Version::next`].
///
/// # Ordering
/// Versions of the same pattern compare lexicographically over their cursors.
/// Versions of different patterns are unordered (`partial_cmp` gives `None`);
/// [`Version::compare`] turns that into an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pattern: Pattern,
    cursors: Vec<u32>,
}

impl Version {
    pub(crate) fn new(pattern: Pattern, cursors: Vec<u32>) -> Self {
        Self { pattern, cursors }
    }

    /// Get pattern
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Get cursor values, one per range segment
    #[inline]
    #[must_use]
    pub fn cursors(&self) -> &[u32] {
        &self.cursors
    }

    /// Following version
    ///
    /// The last range is incremented; a range past its maximum resets to its
    /// minimum and carries into the range before it.
    ///
    /// # Errors
    /// Returns [`VersionError::Overflow`] if every range is at its maximum
    pub fn next(&self) -> VersionResult<Self> {
        let mut cursors = self.cursors.clone();
        let bounds: Vec<(u32, u32)> = self.pattern.bounds().collect();
        for (cursor, (min, max)) in cursors.iter_mut().zip(bounds).rev() {
            if *cursor < max {
                *cursor += 1;
                return Ok(Self::new(self.pattern.clone(), cursors));
            }
            *cursor = min;
        }
        Err(VersionError::Overflow { id: self.as_id() })
    }

    /// Compare with a version that must share this version's pattern
    ///
    /// # Errors
    /// Returns [`VersionError::PatternMismatch`] for versions of different
    /// patterns
    pub fn compare(&self, other: &Self) -> VersionResult<Ordering> {
        self.partial_cmp(other).ok_or(VersionError::PatternMismatch)
    }

    /// Textual id, as accepted by [`Pattern::version`]
    #[must_use]
    pub fn as_id(&self) -> String {
        self.to_string()
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.pattern != other.pattern {
            return None;
        }
        Some(self.cursors.cmp(&other.cursors))
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut cursors = self.cursors.iter();
        for segment in self.pattern.segments() {
            match segment {
                Segment::Literal(text) => f.write_str(text)?,
                Segment::Range { width, .. } => {
                    let value = cursors.next().copied().unwrap_or_default();
                    match width {
                        Some(width) => write!(f, "{value:0width$}")?,
                        None => write!(f, "{value}")?,
                    }
                }
            }
        }
        Ok(())
    }
}
