//! Actual parameter lists against formal parameter lists.

use ttcn_ir::{AssignmentId, Location, ValueId};

use crate::check::Checker;
use crate::error::SemaError;
use crate::graph::{ActualParameter, ValueKind};
use crate::symbols::{AssignmentKind, ParameterKind};

impl Checker<'_> {
    pub(crate) fn check_actual_parameters(
        &mut self,
        target: AssignmentId,
        actuals: &[ActualParameter],
        location: Location,
    ) {
        let name = self.graph.assignment_name(target);
        let formals: Vec<AssignmentId> = match self.graph.assignment(target).formal_parameters {
            Some(list) => self.graph.scope(list).assignments().iter().collect(),
            None => Vec::new(),
        };

        if formals.is_empty() && !self.graph.assignment(target).kind.is_parameterizable() {
            let description = self.graph.assignment(target).kind.description();
            self.report(SemaError::ParameterMismatch {
                location,
                message: format!("the {description} `{name}` cannot be parameterized"),
            });
            return;
        }
        if actuals.len() > formals.len() {
            self.report(SemaError::ParameterMismatch {
                location,
                message: format!(
                    "too many parameters for `{name}`: expected at most {}, found {}",
                    formals.len(),
                    actuals.len()
                ),
            });
            return;
        }

        for (position, &formal) in formals.iter().enumerate() {
            let formal_data = self.graph.assignment(formal);
            let (kind, ty, default) = (formal_data.kind, formal_data.ty, formal_data.value);
            let formal_name = self.graph.assignment_name(formal);
            let AssignmentKind::Parameter(parameter) = kind else {
                self.internal(
                    formal_data.location,
                    format!("`{formal_name}` in a formal parameter list is not a parameter"),
                );
                continue;
            };

            match actuals.get(position) {
                None | Some(ActualParameter::NotUsed(_)) if default.is_some() => {}
                None => self.report(SemaError::ParameterMismatch {
                    location,
                    message: format!("missing actual parameter for `{formal_name}` of `{name}`"),
                }),
                Some(ActualParameter::NotUsed(at)) => {
                    self.report(SemaError::ParameterMismatch {
                        location: *at,
                        message: format!(
                            "`-` is not allowed for `{formal_name}`, which has no default value"
                        ),
                    });
                }
                Some(&ActualParameter::Value(value)) => {
                    if self.check_actual_kind(parameter, value, formal_name) {
                        self.check_value(value, ty, false);
                    }
                }
            }
        }
    }

    /// Timer, port and by-reference parameters take a reference to the
    /// right kind of definition.
    fn check_actual_kind(
        &mut self,
        parameter: ParameterKind,
        value: ValueId,
        formal_name: &str,
    ) -> bool {
        let location = self.graph.value(value).location;
        let needs_reference = parameter.is_by_reference()
            || matches!(parameter, ParameterKind::Timer | ParameterKind::Port);
        if !needs_reference {
            return true;
        }

        let target = match self.graph.value(value).kind {
            ValueKind::Reference(reference) => self.resolve(reference),
            _ => {
                self.report(SemaError::ParameterMismatch {
                    location,
                    message: format!(
                        "the {} `{formal_name}` takes a reference, not a value",
                        parameter.description()
                    ),
                });
                return false;
            }
        };
        let Some(target) = target else {
            return false;
        };

        let kind = self.graph.assignment(target).kind;
        let fits = match parameter {
            ParameterKind::Timer => kind.is_timer(),
            ParameterKind::Port => kind.is_port(),
            _ => kind.is_writable(),
        };
        if !fits {
            let expected = match parameter {
                ParameterKind::Timer => "timer",
                ParameterKind::Port => "port",
                _ => "variable or parameter",
            };
            self.report(SemaError::ParameterMismatch {
                location,
                message: format!(
                    "the {} `{formal_name}` requires a {expected}, found a {}",
                    parameter.description(),
                    kind.description()
                ),
            });
        }
        // Timers and ports carry no value type to compare.
        fits && parameter.is_by_reference()
    }
}
