//! Check-cycle timestamps.
//!
//! Every check pass runs under one timestamp. Entities remember the last
//! timestamp they were checked under and skip heavyweight work when asked
//! again within the same pass.

use std::fmt;

/// A pass-scoped monotonic counter value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from its raw value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Timestamp(raw)
    }

    /// Get the raw value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Whether `last` (an entity's last-checked stamp) is already current
    /// for a pass running under `self`.
    #[inline]
    pub fn is_covered_by(self, last: Option<Timestamp>) -> bool {
        last.is_some_and(|last| last >= self)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Issues strictly increasing timestamps, one per check cycle.
#[derive(Debug, Default)]
pub struct TimestampGenerator {
    last: u64,
}

impl TimestampGenerator {
    /// Create a generator whose first timestamp is `T1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next timestamp.
    pub fn next(&mut self) -> Timestamp {
        self.last += 1;
        Timestamp(self.last)
    }

    /// The most recently issued timestamp, if any.
    pub fn current(&self) -> Option<Timestamp> {
        (self.last > 0).then_some(Timestamp(self.last))
    }
}
