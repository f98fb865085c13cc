//! Declaration and scope checking, plus value and type recursion.

use ttcn_ir::{AssignmentId, ScopeId, TypeId, ValueId};

use super::Checker;
use crate::chain::{Link, ReferenceChain};
use crate::error::SemaError;
use crate::graph::{SubReference, TypeKind, ValueKind};
use crate::scope::ScopeKind;
use crate::symbols::AssignmentKind;

impl Checker<'_> {
    /// Check the declarations, statements and child scopes of `scope`.
    pub fn check_scope(&mut self, scope: ScopeId) {
        if self
            .timestamp
            .is_covered_by(self.graph.scope(scope).last_checked)
        {
            return;
        }
        self.graph.scope_mut(scope).last_checked = Some(self.timestamp);

        let duplicates = self.graph.scope(scope).assignments().duplicates().to_vec();
        for duplicate in duplicates {
            let first = self.graph.assignment(duplicate.first);
            let repeated = self.graph.assignment(duplicate.repeated);
            let name = self.graph.assignment_name(duplicate.first).to_owned();
            let (first_at, repeated_at) = (first.location, repeated.location);
            self.report(SemaError::DuplicateDefinition {
                name: name.clone(),
                location: first_at,
                other: repeated_at,
                first: true,
            });
            self.report(SemaError::DuplicateDefinition {
                name,
                location: repeated_at,
                other: first_at,
                first: false,
            });
        }

        let assignments: Vec<AssignmentId> = self.graph.scope(scope).assignments().iter().collect();
        for assignment in assignments {
            self.check_assignment(assignment);
        }

        let statements = self.graph.scope(scope).statements().to_vec();
        for statement in &statements {
            self.check_statement(scope, statement);
        }

        let children: Vec<ScopeId> = self.graph.scope(scope).children().map(|(_, c)| c).collect();
        for child in children {
            self.check_scope(child);
        }
    }

    /// Check one declaration.
    ///
    /// Idempotent within a pass: a declaration already checked under the
    /// current timestamp (or being checked further up the stack) returns
    /// immediately.
    pub fn check_assignment(&mut self, id: AssignmentId) {
        if self
            .timestamp
            .is_covered_by(self.graph.assignment(id).last_checked)
        {
            return;
        }
        self.graph.assignment_mut(id).last_checked = Some(self.timestamp);

        if let Err(exhausted) = self.budget.try_enter() {
            let location = self.graph.assignment(id).location;
            tracing::warn!(limit = exhausted.limit, "recursion budget exhausted");
            self.report(SemaError::RecursionBudget {
                location,
                limit: exhausted.limit,
            });
            self.graph.assignment_mut(id).erroneous = true;
            return;
        }
        ttcn_stack::ensure_sufficient_stack(|| self.check_assignment_inner(id));
        self.budget.exit();
    }

    fn check_assignment_inner(&mut self, id: AssignmentId) {
        let data = self.graph.assignment(id);
        let (kind, ty, value) = (data.kind, data.ty, data.value);
        let (params, body) = (data.formal_parameters, data.body);
        tracing::trace!(name = self.graph.assignment_name(id), ?kind, "checking definition");

        self.check_uniqueness(id);

        if let Some(ty) = ty {
            self.check_type(ty);
            if kind == AssignmentKind::Type {
                self.check_type_recursion_root(ty);
            }
        }
        if let Some(params) = params {
            self.check_scope(params);
        }

        if let Some(value) = value {
            if kind.is_foldable() && self.has_value_recursion(id, value) {
                self.graph.assignment_mut(id).erroneous = true;
            } else {
                // A function's `ty` is its return type, not the type of
                // anything carried in `value`.
                let expected = match kind {
                    AssignmentKind::Timer
                    | AssignmentKind::Function
                    | AssignmentKind::ExternalFunction
                    | AssignmentKind::Altstep
                    | AssignmentKind::Testcase => None,
                    _ => ty,
                };
                self.check_value(value, expected, false);
            }
        }

        if let Some(body) = body {
            self.check_scope(body);
        }
    }

    /// A local definition must not hide one of an enclosing scope.
    fn check_uniqueness(&mut self, id: AssignmentId) {
        let data = self.graph.assignment(id);
        let (name, scope, location) = (data.name, data.scope, data.location);
        let scope_data = self.graph.scope(scope);
        if scope_data.kind == ScopeKind::Module {
            return;
        }
        if scope_data.assignments().get(name) != Some(id) {
            // A duplicate; reported by the scope.
            return;
        }
        let Some(parent) = scope_data.parent else {
            return;
        };
        if let Some(hidden) = self.graph.lookup_lexical(parent, name) {
            let hidden_at = self.graph.assignment(hidden).location;
            self.report(SemaError::NotUnique {
                location,
                name: self.graph.assignment_name(id).to_owned(),
                hidden: hidden_at,
            });
        }
    }

    /// Whether unfolding the value of `id` leads back to `id` or into
    /// another cycle. Every cycle found is reported at its participants.
    fn has_value_recursion(&mut self, id: AssignmentId, value: ValueId) -> bool {
        let mut chain = self.pool.take(Some(ttcn_diagnostic::Severity::Error));
        chain.add(Link::Assignment(id), self.graph, self.sink);
        let found = self.value_recursion(value, &mut chain);
        self.pool.release(chain);
        found
    }

    fn value_recursion(&mut self, value: ValueId, chain: &mut ReferenceChain<Link>) -> bool {
        let kind = self.graph.value(value).kind.clone();
        match kind {
            ValueKind::Reference(reference) => {
                // Enumeration items are resolved against the expected type
                // later on.
                if self.is_bare_unresolvable(reference).is_some() {
                    return false;
                }
                let Some(target) = self.resolve(reference) else {
                    return false;
                };
                let data = self.graph.assignment(target);
                if !data.kind.is_foldable() {
                    return false;
                }
                let Some(next) = data.value else {
                    return false;
                };
                chain.mark_state();
                let link = Link::Assignment(target);
                let found = if chain.add(link, self.graph, self.sink) {
                    ttcn_stack::ensure_sufficient_stack(|| self.value_recursion(next, chain))
                } else {
                    self.mark_cycle_erroneous(chain, link);
                    true
                };
                chain.previous_state();
                found
            }
            ValueKind::Unary(_, operand) => self.value_recursion(operand, chain),
            ValueKind::Binary(_, left, right) => {
                let mut found = false;
                for operand in [left, right] {
                    chain.mark_state();
                    found |= self.value_recursion(operand, chain);
                    chain.previous_state();
                }
                found
            }
            ValueKind::Sequence(items) => {
                let mut found = false;
                for item in items {
                    chain.mark_state();
                    found |= self.value_recursion(item.value, chain);
                    chain.previous_state();
                }
                found
            }
            ValueKind::SequenceOf(items) => {
                let mut found = false;
                for item in items {
                    chain.mark_state();
                    found |= self.value_recursion(item, chain);
                    chain.previous_state();
                }
                found
            }
            _ => false,
        }
    }

    fn mark_cycle_erroneous(&mut self, chain: &ReferenceChain<Link>, closing: Link) {
        let Some(start) = chain.position(&closing) else {
            return;
        };
        for link in &chain.links()[start..] {
            match *link {
                Link::Assignment(a) => self.graph.assignment_mut(a).erroneous = true,
                Link::Type(t) => self.graph.ty_mut(t).erroneous = true,
            }
        }
    }

    /// Look for a type that contains itself without an escape (an optional
    /// field, an empty list). Runs once per type and pass.
    fn check_type_recursion_root(&mut self, ty: TypeId) {
        if self
            .timestamp
            .is_covered_by(self.graph.ty(ty).recursion_checked)
        {
            return;
        }
        let mut chain = self.pool.take(Some(ttcn_diagnostic::Severity::Error));
        self.type_recursion(ty, &mut chain);
        self.pool.release(chain);
        self.graph.ty_mut(ty).recursion_checked = Some(self.timestamp);
    }

    fn type_recursion(&mut self, ty: TypeId, chain: &mut ReferenceChain<Link>) {
        let link = Link::Type(ty);
        if !chain.add(link, self.graph, self.sink) {
            self.mark_cycle_erroneous(chain, link);
            return;
        }
        // Anything reachable from a fully checked type has been searched.
        if chain.len() > 1
            && self
                .timestamp
                .is_covered_by(self.graph.ty(ty).recursion_checked)
        {
            return;
        }

        let next: Vec<TypeId> = match self.graph.ty(ty).kind.clone() {
            TypeKind::Referenced(reference) => self
                .referenced_type(reference)
                .into_iter()
                .collect(),
            TypeKind::Record(fields) | TypeKind::Set(fields) => fields
                .iter()
                .filter(|f| !f.optional)
                .map(|f| f.ty)
                .collect(),
            TypeKind::Array {
                element, length, ..
            } if length > 0 => vec![element],
            // A single alternative leaves no way out of the recursion.
            TypeKind::Union(fields) if fields.len() == 1 => {
                fields.iter().map(|f| f.ty).collect()
            }
            _ => Vec::new(),
        };
        for next in next {
            chain.mark_state();
            ttcn_stack::ensure_sufficient_stack(|| self.type_recursion(next, chain));
            chain.previous_state();
        }
    }

    /// Declared type of the type definition a type reference denotes.
    pub(crate) fn referenced_type(&mut self, reference: ttcn_ir::ReferenceId) -> Option<TypeId> {
        let target = self.resolve(reference)?;
        let data = self.graph.assignment(target);
        if data.kind != AssignmentKind::Type {
            return None;
        }
        // `T.field` denotes the type of a field of `T`.
        let path = self.graph.reference(reference).path().to_vec();
        let ty = data.ty?;
        if path.len() <= 1 {
            return Some(ty);
        }
        let rest: Vec<SubReference> = path[1..].to_vec();
        let scope = self.graph.reference(reference).scope;
        self.walk_subreferences(ty, &rest, scope).map(|end| end.ty)
    }
}
