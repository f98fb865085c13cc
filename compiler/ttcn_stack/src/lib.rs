//! Stack safety utilities for deep re-entrant checking.
//!
//! Resolving a reference can check the referenced definition, which resolves
//! more references, so checking depth follows the nesting of the checked
//! modules rather than any fixed bound. Two tools keep that safe:
//!
//! - [`ensure_sufficient_stack`] grows the native stack on demand;
//! - [`DepthBudget`] caps the nesting so pathological inputs become a
//!   reported error instead of unbounded memory use.
//!
//! # Platform Support
//!
//! - **Native targets**: Uses the `stacker` crate to grow the stack on demand.
//! - **WASM targets**: No-op passthrough (WASM has its own stack management).
//!
//! # Configuration
//!
//! - **Red zone**: 100KB - If less than this remains, we grow the stack
//! - **Growth size**: 1MB - Each growth allocates this much additional space

use std::fmt;

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
///
/// If the remaining stack is below the red zone threshold, this will
/// allocate additional stack space before calling `f`.
///
/// # Example
///
/// ```text
/// fn check_assignment(&mut self, id: AssignmentId) {
///     ensure_sufficient_stack(|| {
///         // ... may resolve references and check their targets ...
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Error returned when entering one more level would exceed the budget.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BudgetExhausted {
    pub limit: usize,
}

impl fmt::Display for BudgetExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "recursion budget of {} nested checks exhausted", self.limit)
    }
}

impl std::error::Error for BudgetExhausted {}

/// Explicit nesting counter with a fixed limit.
///
/// Every successful [`try_enter`](Self::try_enter) must be paired with one
/// [`exit`](Self::exit).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthBudget {
    limit: usize,
    depth: usize,
}

impl DepthBudget {
    pub fn new(limit: usize) -> Self {
        DepthBudget { limit, depth: 0 }
    }

    /// Enter one level, failing if the limit is already reached.
    pub fn try_enter(&mut self) -> Result<(), BudgetExhausted> {
        if self.depth >= self.limit {
            return Err(BudgetExhausted { limit: self.limit });
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave one level.
    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
