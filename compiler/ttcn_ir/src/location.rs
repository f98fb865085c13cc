//! Source locations: a file handle plus a byte span.

use std::fmt;

use crate::Span;

/// Handle of one source file known to the embedding tool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct SourceId(u32);

impl SourceId {
    /// Create a source handle.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        SourceId(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceId({})", self.0)
    }
}

/// Where a node physically sits: a source file and a byte span inside it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Default)]
pub struct Location {
    pub source: SourceId,
    pub span: Span,
}

impl Location {
    /// Location for nodes synthesized by the checker.
    pub const DUMMY: Location = Location {
        source: SourceId(0),
        span: Span::DUMMY,
    };

    /// Create a location.
    #[inline]
    pub const fn new(source: SourceId, span: Span) -> Self {
        Location { source, span }
    }

    /// Convenience constructor from raw offsets.
    #[inline]
    pub const fn at(source: SourceId, start: u32, end: u32) -> Self {
        Location {
            source,
            span: Span::new(start, end),
        }
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}", self.source.0, self.span)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file {} [{}]", self.source.0, self.span)
    }
}
