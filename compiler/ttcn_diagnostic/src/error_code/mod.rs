//! Error codes for all semantic diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E2003`) with the first digit
//! indicating the area. Stable across releases so tools can filter on them.

use std::fmt;

/// Error codes for all semantic diagnostics.
///
/// Format: E#### / W#### where the first digit indicates the area:
/// - E2xxx: Semantic errors (resolution, cycles, compatibility)
/// - E9xxx: Internal errors
/// - W1xxx: Code-quality warnings
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ErrorCode {
    // Semantic Errors (E2xxx)
    /// Incompatible type
    E2001,
    /// Incompatible subtype
    E2002,
    /// Unresolved reference
    E2003,
    /// Duplicate definition
    E2004,
    /// Circular reference (value or type)
    E2005,
    /// Circular module importation
    E2006,
    /// Actual/formal parameter mismatch
    E2007,
    /// Reference to a non-existent field or a bad index
    E2008,
    /// Unknown imported module
    E2009,
    /// Value does not fit the expected type
    E2010,
    /// Definition not visible from the requesting module
    E2011,
    /// Definition not unique in the scope hierarchy
    E2012,
    /// Reference to the wrong kind of definition
    E2013,

    // Internal Errors (E9xxx)
    /// Internal invariant violation
    E9001,
    /// Recursion budget exhausted
    E9002,

    // Warnings (W1xxx)
    /// Unused definition
    W1001,
    /// Unused import
    W1002,
    /// Naming convention violation
    W1003,
}

impl ErrorCode {
    /// All error codes, for exhaustive iteration.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E2012,
        ErrorCode::E2013,
        ErrorCode::E9001,
        ErrorCode::E9002,
        ErrorCode::W1001,
        ErrorCode::W1002,
        ErrorCode::W1003,
    ];

    /// Get the code as a string (e.g., "E2003").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E2013 => "E2013",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
            ErrorCode::W1001 => "W1001",
            ErrorCode::W1002 => "W1002",
            ErrorCode::W1003 => "W1003",
        }
    }

    /// Short description, used by `--explain` style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "incompatible type",
            ErrorCode::E2002 => "incompatible subtype",
            ErrorCode::E2003 => "unresolved reference",
            ErrorCode::E2004 => "duplicate definition",
            ErrorCode::E2005 => "circular reference",
            ErrorCode::E2006 => "circular module importation",
            ErrorCode::E2007 => "parameter mismatch",
            ErrorCode::E2008 => "non-existent field or bad index",
            ErrorCode::E2009 => "unknown module",
            ErrorCode::E2010 => "value does not fit the type",
            ErrorCode::E2011 => "definition not visible",
            ErrorCode::E2012 => "definition not unique in the scope hierarchy",
            ErrorCode::E2013 => "wrong kind of definition",
            ErrorCode::E9001 => "internal error",
            ErrorCode::E9002 => "recursion budget exhausted",
            ErrorCode::W1001 => "unused definition",
            ErrorCode::W1002 => "unused import",
            ErrorCode::W1003 => "naming convention",
        }
    }

    /// Check if this is a semantic error code.
    pub fn is_semantic_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Check if this is an internal error code.
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001 | ErrorCode::E9002)
    }

    /// Check if this is a warning code (W prefix).
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::W1001 | ErrorCode::W1002 | ErrorCode::W1003)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2001"` or `"W1001"`.
///
/// Case-insensitive. Derived from [`ErrorCode::ALL`] and [`ErrorCode::as_str()`].
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
