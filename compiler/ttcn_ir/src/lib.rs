//! TTCN IR - shared vocabulary of the semantic core
//!
//! This crate contains the small, copyable data types every other crate of
//! the checker speaks in:
//! - Spans and locations for diagnostics and scope intervals
//! - Interned identifiers with TTCN-3 / ASN.1 / internal spellings
//! - Arena handles for the module graph
//! - Check-cycle timestamps
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: names are `Identifier(u32)`, compared by value
//! - **Flatten Everything**: graph nodes are addressed by `u32` handles, never
//!   by owning or weak pointers

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod ident;
mod ids;
mod location;
mod span;
mod timestamp;

pub use ident::{
    asn_to_name, is_reserved_word, name_to_asn, name_to_ttcn, reserved_words, to_internal,
    ttcn_to_name, Dialect, Identifier, IdentifierTable, InternError, SharedIdentifierTable,
};
pub use ids::{AssignmentId, ModuleId, ReferenceId, ScopeId, TypeId, ValueId};
pub use location::{Location, SourceId};
pub use span::{Span, SpanError};
pub use timestamp::{Timestamp, TimestampGenerator};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Identifier, Location, TypeId};
    crate::static_assert_size!(Identifier, 4);
    crate::static_assert_size!(TypeId, 4);
    crate::static_assert_size!(Location, 12);
}
