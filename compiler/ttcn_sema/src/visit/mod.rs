//! Generic traversal of the module graph.
//!
//! [`walk`] visits a node and, unless told otherwise, everything below it:
//! a scope's declarations, statements and child scopes; a declaration's type
//! and value; the types, values and references those contain. The callback
//! steers the walk with a [`VisitAction`].
//!
//! ```text
//! let mut count = 0;
//! walk(&graph, Node::Module(m), &mut |_, node| {
//!     if let Node::Reference(_) = node {
//!         count += 1;
//!     }
//!     VisitAction::Continue
//! });
//! ```

use ttcn_ir::{AssignmentId, Location, ModuleId, ReferenceId, ScopeId, TypeId, ValueId};

use crate::graph::{ActualParameter, ModuleGraph, StatementKind, SubReference, TypeKind, ValueKind};
use crate::scope::ScopeKind;

/// What the walk does after a node was visited.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VisitAction {
    Continue,
    /// Do not descend into this node.
    Skip,
    /// Stop the whole walk.
    Abort,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Node {
    Module(ModuleId),
    Scope(ScopeId),
    Assignment(AssignmentId),
    Type(TypeId),
    Value(ValueId),
    Reference(ReferenceId),
}

/// Visit `node` and its descendants in source order. Returns `false` when
/// the callback aborted the walk.
pub fn walk<F>(graph: &ModuleGraph, node: Node, visit: &mut F) -> bool
where
    F: FnMut(&ModuleGraph, Node) -> VisitAction,
{
    match visit(graph, node) {
        VisitAction::Continue => {}
        VisitAction::Skip => return true,
        VisitAction::Abort => return false,
    }
    let children = children(graph, node);
    children
        .into_iter()
        .all(|child| ttcn_stack::ensure_sufficient_stack(|| walk(graph, child, visit)))
}

fn children(graph: &ModuleGraph, node: Node) -> Vec<Node> {
    let mut out = Vec::new();
    match node {
        Node::Module(module) => out.push(Node::Scope(graph.module(module).scope)),
        Node::Scope(scope) => {
            let data = graph.scope(scope);
            out.extend(data.assignments().iter().map(Node::Assignment));
            for statement in data.statements() {
                match statement.kind {
                    StatementKind::Assignment { target, value } => {
                        out.push(Node::Reference(target));
                        out.push(Node::Value(value));
                    }
                    StatementKind::Evaluate(value) | StatementKind::Return(Some(value)) => {
                        out.push(Node::Value(value));
                    }
                    StatementKind::Return(None) => {}
                }
            }
            out.extend(data.children().map(|(_, child)| Node::Scope(child)));
        }
        Node::Assignment(assignment) => {
            let data = graph.assignment(assignment);
            out.extend(data.ty.map(Node::Type));
            out.extend(data.value.map(Node::Value));
        }
        Node::Type(ty) => match &graph.ty(ty).kind {
            TypeKind::Referenced(reference) => out.push(Node::Reference(*reference)),
            TypeKind::Record(fields) | TypeKind::Set(fields) | TypeKind::Union(fields) => {
                out.extend(fields.iter().map(|f| Node::Type(f.ty)));
            }
            TypeKind::RecordOf(element)
            | TypeKind::SetOf(element)
            | TypeKind::Array { element, .. } => out.push(Node::Type(*element)),
            TypeKind::Component { extends, .. } => {
                out.extend(extends.iter().copied().map(Node::Reference));
            }
            _ => {}
        },
        Node::Value(value) => match &graph.value(value).kind {
            ValueKind::Reference(reference) => out.push(Node::Reference(*reference)),
            ValueKind::Unary(_, operand) => out.push(Node::Value(*operand)),
            ValueKind::Binary(_, left, right) => {
                out.push(Node::Value(*left));
                out.push(Node::Value(*right));
            }
            ValueKind::Sequence(items) => out.extend(items.iter().map(|i| Node::Value(i.value))),
            ValueKind::SequenceOf(items) => out.extend(items.iter().copied().map(Node::Value)),
            _ => {}
        },
        Node::Reference(reference) => {
            for subref in &graph.reference(reference).subrefs {
                match subref {
                    SubReference::Array { index, .. } => out.push(Node::Value(*index)),
                    SubReference::Parameterized { actuals, .. } => {
                        out.extend(actuals.iter().filter_map(|a| match a {
                            ActualParameter::Value(value) => Some(Node::Value(*value)),
                            ActualParameter::NotUsed(_) => None,
                        }));
                    }
                    SubReference::Field { .. } => {}
                }
            }
        }
    }
    out
}

/// Every place that denotes `target`, searched from `scope`: the
/// declaration itself and each reference a check pass resolved to it.
///
/// For module-level declarations the modules recorded as referring to
/// `target` are searched as well. Sorted, without repeats.
pub fn find_references(graph: &ModuleGraph, target: AssignmentId, scope: ScopeId) -> Vec<Location> {
    let data = graph.assignment(target);
    let mut roots = vec![graph.search_scope(scope)];
    if graph.scope(data.scope).kind == ScopeKind::Module {
        roots.extend(
            data.referencing_modules()
                .map(|module| graph.module(module).scope),
        );
    }

    let mut found = vec![data.location];
    for root in roots {
        walk(graph, Node::Scope(root), &mut |graph, node| {
            if let Node::Reference(reference) = node {
                let data = graph.reference(reference);
                if data.resolved() == Some(target) {
                    found.push(data.location);
                }
            }
            VisitAction::Continue
        });
    }
    found.sort_unstable();
    found.dedup();
    tracing::debug!(
        definition = graph.assignment_name(target),
        count = found.len(),
        "found references"
    );
    found
}
