//! Semantic core of a TTCN-3 / ASN.1 frontend.
//!
//! The parser hands over a [`ModuleGraph`]: modules, nested scopes, named
//! declarations, types, values and references, all stored in arenas and
//! linked by handles. A check pass ([`check_modules`] or [`Checker`])
//! annotates the graph in place:
//!
//! - Every reference is resolved through the scope hierarchy and the import
//!   clauses of its module, honouring visibility.
//! - Circular references (through values, types and imports) are detected
//!   with [`ReferenceChain`] and reported once per participant.
//! - Values are checked against their expected types and types against each
//!   other with the compatibility engine ([`CompatibilityLevel`]).
//!
//! Problems are reported as [`Diagnostic`](ttcn_diagnostic::Diagnostic)s;
//! nothing in a pass panics on user input.
//!
//! Enable debug output with `RUST_LOG=ttcn_sema=debug` after calling
//! [`init_tracing`].

mod chain;
mod check;
mod compat;
mod config;
mod error;
mod graph;
mod resolve;
mod scope;
mod subtype;
mod symbols;
mod visit;

pub use chain::{
    pair_registered, ChainLink, ChainPool, Link, ModuleImportationChain, ModuleLink,
    ReferenceChain, TypeChain,
};
pub use check::{check_modules, CheckResult, Checker};
pub use compat::{CompatibilityLevel, TypeCompatibilityInfo};
pub use config::{CheckConfig, CompatibilityMode, NamingConventions, ReportLevel};
pub use error::SemaError;
pub use graph::{
    ActualParameter, AsnStringKind, AssignmentData, BinaryOp, EnumItem, Field, GraphBuilder,
    Import, ModuleData, ModuleGraph, NamedValue, ReferenceData, Resolution, Statement,
    StatementKind, SubReference, TypeData, TypeKind, TypeOwner, UnaryOp, ValueData, ValueKind,
    Verdict,
};
pub use resolve::PathEnd;
pub use scope::{Lookup, ScopeData, ScopeKind};
pub use subtype::{IntRange, LengthRange, Subtype};
pub use symbols::{
    AssignmentKind, AssignmentTable, Definition, Duplicate, ExportRule, ParameterKind, Visibility,
};
pub use visit::{find_references, walk, Node, VisitAction};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call more than once. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // An embedder may have installed its own subscriber already.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
