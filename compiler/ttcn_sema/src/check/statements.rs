//! Statements in statement blocks.

use ttcn_ir::{AssignmentId, Location, ScopeId, ValueId};

use super::Checker;
use crate::error::SemaError;
use crate::graph::{Statement, StatementKind};
use crate::symbols::AssignmentKind;

impl Checker<'_> {
    pub(crate) fn check_statement(&mut self, scope: ScopeId, statement: &Statement) {
        match statement.kind {
            StatementKind::Assignment { target, value } => {
                let Some(assigned) = self.resolve(target) else {
                    return;
                };
                let kind = self.graph.assignment(assigned).kind;
                if !kind.is_writable() {
                    self.report(SemaError::WrongKind {
                        location: self.graph.reference(target).location,
                        name: self.graph.reference_text(target),
                        expected: "variable or parameter",
                        found: kind.description(),
                    });
                    return;
                }
                match self.reference_type(target) {
                    Some(end) => self.check_value(value, Some(end.ty), end.optional),
                    None => self.check_value(value, None, false),
                }
            }
            StatementKind::Evaluate(value) => self.check_value(value, None, false),
            StatementKind::Return(value) => self.check_return(scope, value, statement.location),
        }
    }

    fn check_return(&mut self, scope: ScopeId, value: Option<ValueId>, location: Location) {
        let Some(owner) = self.enclosing_behaviour(scope) else {
            self.report(SemaError::ValueMismatch {
                location,
                message: "`return` outside of a function, altstep or testcase".to_owned(),
            });
            return;
        };
        let data = self.graph.assignment(owner);
        let (kind, return_type) = (data.kind, data.ty);
        let name = self.graph.assignment_name(owner);

        match (value, return_type) {
            (Some(value), Some(ty)) if kind == AssignmentKind::Function => {
                self.check_value(value, Some(ty), false);
            }
            (Some(value), _) => {
                let at = self.graph.value(value).location;
                self.report(SemaError::ValueMismatch {
                    location: at,
                    message: format!(
                        "the {} `{name}` does not return a value",
                        kind.description()
                    ),
                });
            }
            (None, Some(_)) if kind == AssignmentKind::Function => {
                self.report(SemaError::ValueMismatch {
                    location,
                    message: format!("missing return value in function `{name}`"),
                });
            }
            (None, _) => {}
        }
    }

    /// The function, altstep or testcase whose body contains `scope`.
    fn enclosing_behaviour(&self, scope: ScopeId) -> Option<AssignmentId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let data = self.graph.scope(id);
            if let Some(owner) = data.owner {
                if matches!(
                    self.graph.assignment(owner).kind,
                    AssignmentKind::Function | AssignmentKind::Altstep | AssignmentKind::Testcase
                ) {
                    return Some(owner);
                }
            }
            current = data.parent;
        }
        None
    }
}
