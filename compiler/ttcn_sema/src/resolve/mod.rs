//! Reference resolution.
//!
//! A reference is resolved once per pass; the outcome is cached on the
//! reference under the pass timestamp. Resolving marks the target used,
//! records which module refers to it and re-enters checking of the target,
//! so a chain of references is checked depth first.

mod fields;
mod params;

pub use fields::PathEnd;

use ttcn_ir::{AssignmentId, Identifier, Location, ModuleId, ReferenceId, ScopeId};

use crate::check::Checker;
use crate::error::SemaError;
use crate::graph::{Resolution, SubReference};
use crate::scope::Lookup;

impl Checker<'_> {
    /// Resolve `reference` to the declaration it denotes.
    ///
    /// Errors are reported once; an unresolvable reference yields `None`
    /// and callers treat the node depending on it as erroneous.
    pub fn resolve(&mut self, reference: ReferenceId) -> Option<AssignmentId> {
        if let Some(cache) = self.graph.reference(reference).cache {
            if cache.timestamp >= self.timestamp {
                return cache.target;
            }
        }
        // Cached before the target is checked: meeting this reference again
        // further down returns at once.
        let target = self.lookup_reference(reference);
        self.graph.reference_mut(reference).cache = Some(Resolution {
            timestamp: self.timestamp,
            target,
        });
        tracing::trace!(
            reference = %self.graph.reference_text(reference),
            ?target,
            "resolved reference"
        );

        let target = target?;
        self.record_usage(reference, target);
        self.check_assignment(target);

        let first = self.graph.reference(reference).path().first().cloned();
        if let Some(SubReference::Parameterized {
            actuals, location, ..
        }) = first
        {
            self.check_actual_parameters(target, &actuals, location);
        }
        Some(target)
    }

    /// The pure lookup part of resolution, with error reporting.
    fn lookup_reference(&mut self, reference: ReferenceId) -> Option<AssignmentId> {
        self.graph.reference_mut(reference).qualifier_split = false;
        let data = self.graph.reference(reference);
        let (scope, location, explicit) = (data.scope, data.location, data.module);
        let requester = self.graph.scope(scope).module;

        let Some(first) = data.subrefs.first() else {
            self.internal(location, "reference without sub-references");
            return None;
        };
        let Some(first_name) = first.name() else {
            self.internal(location, "reference starting with an index");
            return None;
        };
        let second_name = data.subrefs.get(1).and_then(SubReference::name);

        if let Some(module) = explicit {
            return self.lookup_qualified(module, first_name, requester, location);
        }

        let lookup = self.graph.resolve_in_scope(scope, first_name);
        match lookup {
            Lookup::Local(target) => return Some(target),
            Lookup::Imported { target, import } => {
                self.graph.module_mut(requester).imports[import].used = true;
                return Some(target);
            }
            Lookup::NotVisible(_) | Lookup::NotFound => {}
        }

        // Local definitions shadow modules, so only now try the leading
        // segment as a module qualifier.
        if let Some(second) = second_name {
            if self.qualifier_candidate(requester, first_name) {
                self.graph.reference_mut(reference).qualifier_split = true;
                return self.lookup_qualified(first_name, second, requester, location);
            }
        }

        match lookup {
            Lookup::NotVisible(hidden) => {
                let owner = self.graph.assignment(hidden).module;
                self.report(SemaError::NotVisible {
                    location,
                    name: self.graph.display_in(requester, first_name).to_owned(),
                    module: self.graph.module_name(owner).to_owned(),
                });
            }
            _ => self.report(SemaError::UnresolvedReference {
                location,
                name: self.graph.display_in(requester, first_name).to_owned(),
            }),
        }
        None
    }

    /// Whether `name` may qualify a reference made in `requester`: the
    /// module itself or one it imports.
    fn qualifier_candidate(&self, requester: ModuleId, name: Identifier) -> bool {
        let module = self.graph.module(requester);
        module.name == name || module.imports.iter().any(|i| i.module_name == name)
    }

    fn lookup_qualified(
        &mut self,
        module_name: Identifier,
        name: Identifier,
        requester: ModuleId,
        location: Location,
    ) -> Option<AssignmentId> {
        let Some(module) = self.graph.module_by_name(module_name) else {
            self.report(SemaError::UnknownModule {
                location,
                name: self.graph.display_in(requester, module_name).to_owned(),
            });
            return None;
        };

        let imported = module == requester
            || self
                .graph
                .module(requester)
                .imports
                .iter()
                .any(|i| i.resolved == Some(module));
        let display = self.graph.display_in(requester, name).to_owned();
        if !imported {
            self.report(SemaError::NotVisible {
                location,
                name: display,
                module: self.graph.module_name(module).to_owned(),
            });
            return None;
        }

        match self.graph.resolve_in_module(module, name, requester) {
            Lookup::Local(target) | Lookup::Imported { target, .. } => {
                for import in &mut self.graph.module_mut(requester).imports {
                    if import.resolved == Some(module) {
                        import.used = true;
                    }
                }
                Some(target)
            }
            Lookup::NotVisible(_) => {
                self.report(SemaError::NotVisible {
                    location,
                    name: display,
                    module: self.graph.module_name(module).to_owned(),
                });
                None
            }
            Lookup::NotFound => {
                self.report(SemaError::UnresolvedReference {
                    location,
                    name: format!("{}.{display}", self.graph.module_name(module)),
                });
                None
            }
        }
    }

    fn record_usage(&mut self, reference: ReferenceId, target: AssignmentId) {
        let scope = self.graph.reference(reference).scope;
        let requester = self.graph.scope(scope).module;
        let data = self.graph.assignment_mut(target);
        data.used = true;
        data.referencing_modules.insert(requester);
    }

    /// Type of the entity a value reference denotes, after walking its
    /// field and index sub-references.
    pub fn reference_type(&mut self, reference: ReferenceId) -> Option<PathEnd> {
        let target = self.resolve(reference)?;
        let ty = self.graph.assignment(target).ty?;
        let data = self.graph.reference(reference);
        let scope: ScopeId = data.scope;
        let rest: Vec<SubReference> = data.path().iter().skip(1).cloned().collect();
        self.walk_subreferences(ty, &rest, scope)
    }
}
