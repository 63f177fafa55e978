//! Version patterns
//!
//! A [`Pattern`] describes the shape of a version id as a list of
//! [`Segment`]s: fixed literal text and bounded numeric ranges. `1.2` matches
//! `[Range(1..=100), Literal("."), Range(0..=10)]`; `2024-03` matches a
//! four-digit range, a dash and a two-digit fixed-width range.

use std::sync::Arc;

use crate::error::{VersionError, VersionResult};
use crate::version::Version;

/// Part of a version pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Text that must appear verbatim
    Literal(String),
    /// Inclusive numeric range, optionally written with a fixed digit count
    Range {
        /// Smallest value
        min: u32,
        /// Largest value
        max: u32,
        /// Zero-padded digit count, `None` for plain numbers
        width: Option<usize>,
    },
}

impl Segment {
    /// Create literal segment
    #[inline]
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Create range segment written without padding
    #[inline]
    #[must_use]
    pub fn range(min: u32, max: u32) -> Self {
        Self::Range {
            min,
            max,
            width: None,
        }
    }

    /// Create range segment always written with `width` digits
    #[inline]
    #[must_use]
    pub fn range_fixed(min: u32, max: u32, width: usize) -> Self {
        Self::Range {
            min,
            max,
            width: Some(width),
        }
    }

    /// Check if segment is a range
    #[inline]
    #[must_use]
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range { .. })
    }
}

/// Validated version pattern
///
/// Cheap to clone; versions keep a handle to the pattern they were parsed
/// with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    segments: Arc<[Segment]>,
}

impl Pattern {
    /// Create pattern from segments
    ///
    /// # Errors
    /// Returns [`VersionError::InvalidPattern`] if
    /// - there is no range segment
    /// - a literal is empty
    /// - a range has `min > max`, or a width too small for `max`
    /// - a range without width is directly followed by another range
    pub fn new(segments: impl IntoIterator<Item = Segment>) -> VersionResult<Self> {
        let segments: Vec<Segment> = segments.into_iter().collect();
        if !segments.iter().any(Segment::is_range) {
            return Err(VersionError::InvalidPattern(
                "pattern needs at least one range".to_string(),
            ));
        }
        for (index, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Literal(text) if text.is_empty() => {
                    return Err(VersionError::InvalidPattern(format!(
                        "segment {index}: empty literal"
                    )));
                }
                Segment::Literal(_) => {}
                Segment::Range { min, max, width } => {
                    if min > max {
                        return Err(VersionError::InvalidPattern(format!(
                            "segment {index}: min {min} exceeds max {max}"
                        )));
                    }
                    if let Some(width) = width {
                        if *width < digits(*max) {
                            return Err(VersionError::InvalidPattern(format!(
                                "segment {index}: width {width} cannot hold {max}"
                            )));
                        }
                    } else if segments.get(index + 1).is_some_and(Segment::is_range) {
                        return Err(VersionError::InvalidPattern(format!(
                            "segment {index}: range followed by a range needs a fixed width"
                        )));
                    }
                }
            }
        }
        Ok(Self {
            segments: segments.into(),
        })
    }

    /// Get segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of range segments (cursor slots of a version)
    #[inline]
    #[must_use]
    pub fn range_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_range()).count()
    }

    /// `(min, max)` of each range segment, in order
    pub(crate) fn bounds(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Range { min, max, .. } => Some((*min, *max)),
            Segment::Literal(_) => None,
        })
    }

    /// Parse a version id
    ///
    /// Literal segments must match exactly. A fixed-width range reads exactly
    /// that many digits; any other range reads up to the next literal or the
    /// end of the id, and rejects leading zeros.
    ///
    /// # Errors
    /// Returns [`VersionError::Parse`] if `id` does not match the pattern or a
    /// number lies outside its range
    pub fn version(&self, id: &str) -> VersionResult<Version> {
        let mut rest = id;
        let mut cursors = Vec::with_capacity(self.range_count());
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(text) => {
                    rest = rest
                        .strip_prefix(text.as_str())
                        .ok_or_else(|| VersionError::parse(id, format!("expected {text:?}")))?;
                }
                Segment::Range { min, max, width } => {
                    let len = match (width, self.segments.get(index + 1)) {
                        (Some(width), _) => *width,
                        (None, Some(Segment::Literal(next))) => {
                            rest.find(next.as_str()).unwrap_or(rest.len())
                        }
                        (None, _) => rest.len(),
                    };
                    let text = rest
                        .get(..len)
                        .ok_or_else(|| VersionError::parse(id, "id ends early"))?;
                    let value = parse_number(text, width.is_none())
                        .map_err(|reason| VersionError::parse(id, reason))?;
                    if !(*min..=*max).contains(&value) {
                        return Err(VersionError::parse(
                            id,
                            format!("{value} outside {min}..={max}"),
                        ));
                    }
                    cursors.push(value);
                    rest = &rest[len..];
                }
            }
        }
        if !rest.is_empty() {
            return Err(VersionError::parse(id, format!("unexpected {rest:?}")));
        }
        Ok(Version::new(self.clone(), cursors))
    }

    /// Oldest version: every range at its minimum
    #[must_use]
    pub fn oldest(&self) -> Version {
        Version::new(self.clone(), self.bounds().map(|(min, _)| min).collect())
    }
}

fn digits(value: u32) -> usize {
    value.checked_ilog10().map_or(1, |log| log as usize + 1)
}

fn parse_number(text: &str, plain: bool) -> Result<u32, String> {
    if text.is_empty() {
        return Err("missing number".to_string());
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("{text:?} is not a number"));
    }
    if plain && text.len() > 1 && text.starts_with('0') {
        return Err(format!("{text:?} has a leading zero"));
    }
    text.parse().map_err(|_| format!("{text:?} is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dotted() -> Pattern {
        Pattern::new([
            Segment::range(1, 100),
            Segment::literal("."),
            Segment::range(0, 10),
        ])
        .unwrap()
    }

    #[test]
    fn pattern_requires_range() {
        let err = Pattern::new([Segment::literal("v")]).unwrap_err();
        assert!(matches!(err, VersionError::InvalidPattern(_)));
    }

    #[test]
    fn pattern_rejects_bad_segments() {
        assert!(Pattern::new([Segment::range(5, 1)]).is_err());
        assert!(Pattern::new([Segment::range_fixed(0, 100, 2)]).is_err());
        assert!(Pattern::new([Segment::literal(""), Segment::range(0, 1)]).is_err());
        assert!(Pattern::new([Segment::range(0, 9), Segment::range(0, 9)]).is_err());
        assert!(Pattern::new([Segment::range_fixed(0, 9, 1), Segment::range(0, 9)]).is_ok());
    }

    #[test]
    fn version_parses_dotted() {
        let version = dotted().version("12.3").unwrap();
        assert_eq!(version.cursors(), &[12, 3]);
    }

    #[test]
    fn version_rejects_mismatch() {
        let pattern = dotted();
        for id in ["12", "12-3", "0.1", "1.11", "a.1", "1.2.3", "01.2", ""] {
            assert!(
                matches!(pattern.version(id), Err(VersionError::Parse { .. })),
                "{id} should not parse"
            );
        }
    }

    #[test]
    fn version_fixed_width() {
        let pattern = Pattern::new([
            Segment::range(2000, 2999),
            Segment::literal("-"),
            Segment::range_fixed(1, 12, 2),
        ])
        .unwrap();
        let version = pattern.version("2024-03").unwrap();
        assert_eq!(version.cursors(), &[2024, 3]);
        assert_eq!(version.as_id(), "2024-03");
        assert!(pattern.version("2024-3").is_err());
    }

    #[test]
    fn adjacent_fixed_ranges() {
        let pattern = Pattern::new([
            Segment::literal("r"),
            Segment::range_fixed(0, 99, 2),
            Segment::range_fixed(0, 99, 2),
        ])
        .unwrap();
        assert_eq!(pattern.version("r0107").unwrap().cursors(), &[1, 7]);
    }

    #[test]
    fn oldest_uses_minimums() {
        assert_eq!(dotted().oldest().as_id(), "1.0");
    }

    #[test]
    fn digit_count() {
        assert_eq!(digits(0), 1);
        assert_eq!(digits(9), 1);
        assert_eq!(digits(10), 2);
        assert_eq!(digits(u32::MAX), 10);
    }
}
