//! Cycle detection along resolution paths.
//!
//! A [`ReferenceChain`] is an ordered list of visited links plus a stack of
//! saved lengths. Adding a link that is already present closes a cycle: the
//! cycle is reported once at every participant, each time rendered starting
//! from that participant. The same machinery serves value unfolding, type
//! recursion and module importation.

use smallvec::SmallVec;
use ttcn_diagnostic::{DiagnosticSink, ReportMode, Severity};
use ttcn_ir::{AssignmentId, Identifier, Location, ModuleId, TypeId};

use crate::error::SemaError;
use crate::graph::ModuleGraph;

/// A node that can appear on a resolution path.
pub trait ChainLink: Clone {
    /// Whatever is needed to describe and locate a link.
    type Context: ?Sized;

    /// Whether two links denote the same node.
    fn same_link(&self, other: &Self) -> bool;

    /// Human readable name for cycle messages.
    fn describe(&self, cx: &Self::Context) -> String;

    /// Where the cycle is reported for this participant.
    fn location(&self, cx: &Self::Context) -> Location;

    /// Error for one rendered rotation of a cycle.
    fn cycle_error(location: Location, chain: String) -> SemaError;
}

/// Link of a value or type recursion chain; equal by identity.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Link {
    Assignment(AssignmentId),
    Type(TypeId),
}

impl ChainLink for Link {
    type Context = ModuleGraph;

    fn same_link(&self, other: &Self) -> bool {
        self == other
    }

    fn describe(&self, graph: &ModuleGraph) -> String {
        match *self {
            Link::Assignment(a) => format!("`{}`", graph.assignment_name(a)),
            Link::Type(t) => format!("`{}`", graph.type_full_name(t)),
        }
    }

    fn location(&self, graph: &ModuleGraph) -> Location {
        match *self {
            Link::Assignment(a) => graph.assignment(a).location,
            Link::Type(t) => graph.ty(t).location,
        }
    }

    fn cycle_error(location: Location, chain: String) -> SemaError {
        SemaError::CircularReference { location, chain }
    }
}

/// Link of a module importation chain; equal by module name.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ModuleLink {
    pub module: ModuleId,
    pub name: Identifier,
}

impl ChainLink for ModuleLink {
    type Context = ModuleGraph;

    fn same_link(&self, other: &Self) -> bool {
        self.name == other.name
    }

    fn describe(&self, graph: &ModuleGraph) -> String {
        format!("`{}`", graph.module_name(self.module))
    }

    fn location(&self, graph: &ModuleGraph) -> Location {
        graph.module(self.module).location
    }

    fn cycle_error(location: Location, chain: String) -> SemaError {
        SemaError::CircularImport { location, chain }
    }
}

pub type ModuleImportationChain = ReferenceChain<ModuleLink>;

/// Visited links with save/rollback marks.
#[derive(Clone, Debug)]
pub struct ReferenceChain<L> {
    links: Vec<L>,
    marks: SmallVec<[usize; 8]>,
    /// `None` detects cycles without reporting them.
    severity: Option<Severity>,
}

impl<L: ChainLink> ReferenceChain<L> {
    pub fn new(severity: Option<Severity>) -> Self {
        ReferenceChain {
            links: Vec::new(),
            marks: SmallVec::new(),
            severity,
        }
    }

    /// Append `link` unless it closes a cycle.
    ///
    /// Returns `false` when the link was already on the chain; the cycle has
    /// then been reported at each participant and the caller must not
    /// descend further.
    pub fn add(&mut self, link: L, cx: &L::Context, sink: &mut DiagnosticSink) -> bool {
        let Some(start) = self.position(&link) else {
            self.links.push(link);
            return true;
        };

        tracing::debug!(
            start,
            len = self.links.len(),
            "cycle closed on resolution chain"
        );
        if let Some(severity) = self.severity {
            for (location, chain) in self.rotations(start, cx) {
                let diag = L::cycle_error(location, chain)
                    .to_diagnostic()
                    .severity(severity);
                sink.report(diag, ReportMode::Singular);
            }
        }
        false
    }

    /// Every rotation of the cycle starting at `start`, each with the
    /// location of the participant it starts from.
    pub fn rotations(&self, start: usize, cx: &L::Context) -> Vec<(Location, String)> {
        let cycle = &self.links[start..];
        let names: Vec<String> = cycle.iter().map(|l| l.describe(cx)).collect();
        (0..cycle.len())
            .map(|j| {
                let mut text = String::new();
                for k in 0..cycle.len() {
                    text.push_str(&names[(j + k) % cycle.len()]);
                    text.push_str(" -> ");
                }
                text.push_str(&names[j]);
                (cycle[j].location(cx), text)
            })
            .collect()
    }

    /// Index of `link` on the chain.
    pub fn position(&self, link: &L) -> Option<usize> {
        self.links.iter().position(|l| l.same_link(link))
    }

    pub fn contains(&self, link: &L) -> bool {
        self.position(link).is_some()
    }

    /// Save the current length.
    pub fn mark_state(&mut self) {
        self.marks.push(self.links.len());
    }

    /// Truncate back to the last saved length.
    pub fn previous_state(&mut self) {
        if let Some(len) = self.marks.pop() {
            self.links.truncate(len);
        }
    }

    pub fn links(&self) -> &[L] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Forget everything, keeping the allocations.
    pub fn clear(&mut self) {
        self.links.clear();
        self.marks.clear();
    }
}

/// Free list of cleared chains.
#[derive(Debug)]
pub struct ChainPool<L> {
    free: Vec<ReferenceChain<L>>,
    enabled: bool,
}

impl<L: ChainLink> ChainPool<L> {
    pub fn new(enabled: bool) -> Self {
        ChainPool {
            free: Vec::new(),
            enabled,
        }
    }

    /// A fresh (empty) chain reporting at `severity`.
    pub fn take(&mut self, severity: Option<Severity>) -> ReferenceChain<L> {
        match self.free.pop() {
            Some(mut chain) => {
                chain.severity = severity;
                chain
            }
            None => ReferenceChain::new(severity),
        }
    }

    /// Return a chain for reuse. Dropped when pooling is off.
    pub fn release(&mut self, mut chain: ReferenceChain<L>) {
        if self.enabled {
            chain.clear();
            self.free.push(chain);
        }
    }

    pub fn idle(&self) -> usize {
        self.free.len()
    }
}

/// Types visited on one side of a compatibility test.
///
/// The left and right chains of one test grow in lockstep, so position `k`
/// of both holds one compared pair.
#[derive(Clone, Debug, Default)]
pub struct TypeChain {
    types: Vec<TypeId>,
    marks: SmallVec<[usize; 8]>,
}

impl TypeChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, ty: TypeId) {
        self.types.push(ty);
    }

    pub fn mark_state(&mut self) {
        self.marks.push(self.types.len());
    }

    pub fn previous_state(&mut self) {
        if let Some(len) = self.marks.pop() {
            self.types.truncate(len);
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Whether the newest type already occurs earlier on the chain.
    pub fn has_recursion(&self) -> bool {
        match self.types.split_last() {
            Some((last, rest)) => rest.contains(last),
            None => false,
        }
    }
}

/// Whether the pair `(a, b)` is already being compared.
pub fn pair_registered(left: &TypeChain, right: &TypeChain, a: TypeId, b: TypeId) -> bool {
    left.types
        .iter()
        .zip(&right.types)
        .any(|(&l, &r)| l == a && r == b)
}
