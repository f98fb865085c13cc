//! Optional end-of-pass reports: unused definitions and imports, naming
//! conventions.

use ttcn_ir::{AssignmentId, ModuleId};

use super::Checker;
use crate::error::SemaError;
use crate::scope::ScopeKind;
use crate::symbols::{AssignmentKind, Visibility};

impl Checker<'_> {
    pub(crate) fn report_unused(&mut self) {
        if let Some(severity) = self.config.unused_definition.severity() {
            for index in 0..self.graph.assignments.len() {
                let id = AssignmentId::from_len(index);
                if self.is_unused(id) {
                    let data = self.graph.assignment(id);
                    let error = SemaError::UnusedDefinition {
                        location: data.location,
                        description: data.kind.description(),
                        name: self.graph.assignment_name(id).to_owned(),
                    };
                    self.report_with(error, severity);
                }
            }
        }

        if let Some(severity) = self.config.unused_import.severity() {
            let modules: Vec<ModuleId> = self.graph.module_ids().collect();
            for module in modules {
                let unused: Vec<_> = self
                    .graph
                    .module(module)
                    .imports
                    .iter()
                    .filter(|i| i.resolved.is_some() && !i.used)
                    .map(|i| (i.location, i.module_name))
                    .collect();
                for (location, name) in unused {
                    let module = self.graph.display_in(module, name).to_owned();
                    self.report_with(SemaError::UnusedImport { location, module }, severity);
                }
            }
        }
    }

    /// Local definitions and private module-level ones are expected to be
    /// referenced at least once.
    fn is_unused(&self, id: AssignmentId) -> bool {
        let data = self.graph.assignment(id);
        if data.used || data.last_checked.is_none() {
            return false;
        }
        if matches!(data.kind, AssignmentKind::Parameter(_)) {
            return false;
        }
        let scope = self.graph.scope(data.scope);
        if scope.assignments().get(data.name) != Some(id) {
            return false;
        }
        match scope.kind {
            ScopeKind::Module => {
                !self.graph.module(data.module).is_asn()
                    && data.visibility == Visibility::Private
            }
            _ => !matches!(
                data.kind,
                AssignmentKind::Function | AssignmentKind::Altstep | AssignmentKind::Testcase
            ),
        }
    }

    pub(crate) fn report_naming(&mut self) {
        let Some(severity) = self.config.naming_convention.severity() else {
            return;
        };
        for index in 0..self.graph.assignments.len() {
            let id = AssignmentId::from_len(index);
            let data = self.graph.assignment(id);
            if self.graph.module(data.module).is_asn() {
                continue;
            }
            let name = self.graph.assignment_name(id);
            if let Some(rule) = self.config.naming.violation(data.kind, name) {
                let error = SemaError::NamingConvention {
                    location: data.location,
                    description: data.kind.description(),
                    name: name.to_owned(),
                    rule,
                };
                self.report_with(error, severity);
            }
        }
    }
}
