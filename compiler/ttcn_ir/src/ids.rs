//! Arena handles for the module graph.
//!
//! Every node category of the semantic graph lives in its own arena and is
//! addressed by a 32-bit index. Handles replace the owning/weak pointer web
//! of a classic syntax tree: a naming parent or an enclosing scope is just
//! another handle, so there are no ownership cycles.

use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create a handle from an arena index.
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Create a handle for the next slot of an arena holding `len` items.
            ///
            /// Arenas never grow past `u32::MAX` entries; the conversion
            /// saturates instead of wrapping.
            #[inline]
            pub fn from_len(len: usize) -> Self {
                $name(u32::try_from(len).unwrap_or(u32::MAX))
            }

            /// Get the index into the arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            /// Get the raw u32 value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

arena_id!(
    /// Handle of a module (the root scope of one compilation unit).
    ModuleId
);
arena_id!(
    /// Handle of a lexical scope.
    ScopeId
);
arena_id!(
    /// Handle of a named, checkable declaration.
    AssignmentId
);
arena_id!(
    /// Handle of a type node.
    TypeId
);
arena_id!(
    /// Handle of a value node.
    ValueId
);
arena_id!(
    /// Handle of a reference node.
    ReferenceId
);
