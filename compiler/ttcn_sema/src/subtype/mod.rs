//! Subtype restrictions: integer ranges, length ranges and patterns.
//!
//! Two restricted types are subtype-compatible when, aspect by aspect, the
//! restrictions they both carry share at least one value. An aspect present on
//! only one side never causes a mismatch.

use std::fmt;

/// Closed integer range; `None` bounds are infinite.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct IntRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl IntRange {
    pub const fn new(min: Option<i64>, max: Option<i64>) -> Self {
        IntRange { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    /// Lower bound not above upper bound.
    pub fn is_valid(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }

    /// Common part of two ranges, `None` when disjoint.
    pub fn intersect(&self, other: &IntRange) -> Option<IntRange> {
        let min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let range = IntRange { min, max };
        range.is_valid().then_some(range)
    }
}

impl fmt::Display for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.min {
            Some(min) => write!(f, "{min}")?,
            None => f.write_str("-infinity")?,
        }
        f.write_str("..")?;
        match self.max {
            Some(max) => write!(f, "{max}"),
            None => f.write_str("infinity"),
        }
    }
}

/// Allowed number of elements or characters; `max: None` is unbounded.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct LengthRange {
    pub min: u64,
    pub max: Option<u64>,
}

impl LengthRange {
    pub const fn new(min: u64, max: Option<u64>) -> Self {
        LengthRange { min, max }
    }

    pub fn contains(&self, len: u64) -> bool {
        len >= self.min && self.max.map_or(true, |max| len <= max)
    }

    pub fn is_valid(&self) -> bool {
        self.max.map_or(true, |max| self.min <= max)
    }

    pub fn intersect(&self, other: &LengthRange) -> Option<LengthRange> {
        let max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let range = LengthRange {
            min: self.min.max(other.min),
            max,
        };
        range.is_valid().then_some(range)
    }

    /// Exactly `len` elements.
    pub fn exact(len: u64) -> Self {
        LengthRange {
            min: len,
            max: Some(len),
        }
    }
}

impl fmt::Display for LengthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "length({max})"),
            Some(max) => write!(f, "length({}..{max})", self.min),
            None => write!(f, "length({}..infinity)", self.min),
        }
    }
}

/// Restrictions attached to one type.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Subtype {
    pub range: Option<IntRange>,
    pub length: Option<LengthRange>,
    pub pattern: Option<String>,
}

impl Subtype {
    pub fn range(min: Option<i64>, max: Option<i64>) -> Self {
        Subtype {
            range: Some(IntRange::new(min, max)),
            ..Subtype::default()
        }
    }

    pub fn length(min: u64, max: Option<u64>) -> Self {
        Subtype {
            length: Some(LengthRange::new(min, max)),
            ..Subtype::default()
        }
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Subtype {
            pattern: Some(pattern.into()),
            ..Subtype::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_none() && self.length.is_none() && self.pattern.is_none()
    }

    /// Restriction of an alias of a restricted type: both sets of aspects
    /// apply. A disjoint aspect keeps the narrower (outer) side.
    #[must_use]
    pub fn narrow(&self, inner: &Subtype) -> Subtype {
        let range = match (&self.range, &inner.range) {
            (Some(a), Some(b)) => a.intersect(b).or(Some(*a)),
            (a, b) => a.or(*b),
        };
        let length = match (&self.length, &inner.length) {
            (Some(a), Some(b)) => a.intersect(b).or(Some(*a)),
            (a, b) => a.or(*b),
        };
        Subtype {
            range,
            length,
            pattern: self.pattern.clone().or_else(|| inner.pattern.clone()),
        }
    }

    /// Check that the two restrictions share at least one value.
    pub fn check_compatible(&self, other: &Subtype) -> Result<(), String> {
        if let (Some(a), Some(b)) = (&self.range, &other.range) {
            if a.intersect(b).is_none() {
                return Err(format!("range ({a}) has no common value with range ({b})"));
            }
        }
        if let (Some(a), Some(b)) = (&self.length, &other.length) {
            if a.intersect(b).is_none() {
                return Err(format!("{a} has no common value with {b}"));
            }
        }
        if let (Some(a), Some(b)) = (&self.pattern, &other.pattern) {
            if a != b {
                return Err(format!("pattern \"{a}\" differs from pattern \"{b}\""));
            }
        }
        Ok(())
    }

    /// Whether an integer value is admitted.
    pub fn admits_integer(&self, value: i64) -> bool {
        self.range.map_or(true, |r| r.contains(value))
    }

    /// Whether a length (string characters or list elements) is admitted.
    pub fn admits_length(&self, len: u64) -> bool {
        self.length.map_or(true, |l| l.contains(len))
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut sep = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            Ok(())
        };
        if let Some(range) = &self.range {
            sep(f)?;
            write!(f, "({range})")?;
        }
        if let Some(length) = &self.length {
            sep(f)?;
            write!(f, "{length}")?;
        }
        if let Some(pattern) = &self.pattern {
            sep(f)?;
            write!(f, "pattern \"{pattern}\"")?;
        }
        Ok(())
    }
}
