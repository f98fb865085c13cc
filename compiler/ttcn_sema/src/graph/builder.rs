//! Construction API for module graphs.
//!
//! A parser (or a test) drives the builder top-down: modules first, then
//! scopes, types and values, and finally the declarations that tie them
//! together. Naming parents are filled in as handles while building.

use ttcn_ir::{
    AssignmentId, Dialect, Identifier, Location, ModuleId, ReferenceId, ScopeId,
    SharedIdentifierTable, TypeId, ValueId,
};

use super::{
    ActualParameter, AssignmentData, EnumItem, Field, Import, ModuleData, ModuleGraph,
    ReferenceData, Statement, StatementKind, SubReference, TypeData, TypeKind, TypeOwner,
    ValueData, ValueKind,
};
use crate::scope::{ScopeData, ScopeKind};
use crate::subtype::Subtype;
use crate::symbols::{Definition, ExportRule};

/// Incremental builder for a [`ModuleGraph`].
pub struct GraphBuilder {
    graph: ModuleGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::with_identifiers(SharedIdentifierTable::new())
    }

    /// Build against an existing identifier table, e.g. one shared with
    /// previously built graphs.
    pub fn with_identifiers(idents: SharedIdentifierTable) -> Self {
        GraphBuilder {
            graph: ModuleGraph::new(idents),
        }
    }

    /// Intern `raw` in the dialect of `module`.
    pub fn intern(&self, module: ModuleId, raw: &str) -> Identifier {
        let dialect = self.graph.module(module).dialect;
        self.graph.identifiers().intern(dialect, raw)
    }

    fn intern_in_scope(&self, scope: ScopeId, raw: &str) -> Identifier {
        self.intern(self.graph.scope(scope).module, raw)
    }

    /// Add a module together with its root scope.
    pub fn module(&mut self, name: &str, dialect: Dialect, location: Location) -> ModuleId {
        let id = ModuleId::from_len(self.graph.modules.len());
        let scope = ScopeId::from_len(self.graph.scopes.len());
        self.graph
            .scopes
            .push(ScopeData::new(ScopeKind::Module, None, id, location));
        let name = self.graph.identifiers().intern(dialect, name);
        self.graph.modules.push(ModuleData {
            name,
            dialect,
            location,
            scope,
            imports: Vec::new(),
            friends: Vec::new(),
            export_rule: ExportRule::All,
        });
        self.graph.register_module_name(name, id);
        id
    }

    /// `import from <name> all;`
    pub fn import(&mut self, module: ModuleId, name: &str, location: Location) {
        let module_name = self.intern(module, name);
        self.graph.module_mut(module).imports.push(Import {
            module_name,
            location,
            resolved: None,
            used: false,
        });
    }

    /// `friend module <name>;`
    pub fn friend(&mut self, module: ModuleId, name: &str) {
        let friend = self.intern(module, name);
        self.graph.module_mut(module).friends.push(friend);
    }

    /// ASN.1 `EXPORTS a, b;`
    pub fn exports(&mut self, module: ModuleId, names: &[&str]) {
        let symbols = names.iter().map(|n| self.intern(module, n)).collect();
        self.graph.module_mut(module).export_rule = ExportRule::Symbols(symbols);
    }

    pub fn root_scope(&self, module: ModuleId) -> ScopeId {
        self.graph.module(module).scope
    }

    /// Add a child scope occupying `location` inside `parent`.
    pub fn scope(&mut self, parent: ScopeId, kind: ScopeKind, location: Location) -> ScopeId {
        let module = self.graph.scope(parent).module;
        let id = ScopeId::from_len(self.graph.scopes.len());
        self.graph
            .scopes
            .push(ScopeData::new(kind, Some(parent), module, location));
        self.graph.scope_mut(parent).add_child(location.span, id);
        id
    }

    /// Add a naming bridge that renames the chain below it to `name`.
    pub fn bridge(&mut self, parent: ScopeId, name: &str, location: Location) -> ScopeId {
        let name = self.intern_in_scope(parent, name);
        self.scope(parent, ScopeKind::NamingBridge { name }, location)
    }

    /// Add a type node. Field and element types without a naming parent
    /// get the new type as theirs.
    pub fn ty(&mut self, module: ModuleId, kind: TypeKind, location: Location) -> TypeId {
        let id = TypeId::from_len(self.graph.types.len());
        let asn = self.graph.module(module).is_asn();
        let mut children: Vec<(TypeId, TypeOwner)> = Vec::new();
        if let Some(fields) = kind.fields() {
            children.extend(fields.iter().map(|f| {
                (
                    f.ty,
                    TypeOwner::Field {
                        parent: id,
                        name: f.name,
                    },
                )
            }));
        }
        if let Some(element) = kind.element() {
            children.push((element, TypeOwner::Element(id)));
        }
        self.graph
            .types
            .push(TypeData::new(kind, location, module, asn));
        for (child, owner) in children {
            let data = self.graph.ty_mut(child);
            if matches!(data.owner, TypeOwner::Anonymous(_)) {
                data.owner = owner;
            }
        }
        id
    }

    /// Type denoted by a (possibly dotted) reference, e.g. `M.T`.
    pub fn type_ref(&mut self, scope: ScopeId, path: &str, location: Location) -> TypeId {
        let reference = self.reference(scope, path, location);
        let module = self.graph.scope(scope).module;
        self.ty(module, TypeKind::Referenced(reference), location)
    }

    pub fn field(&self, module: ModuleId, name: &str, ty: TypeId, location: Location) -> Field {
        Field {
            name: self.intern(module, name),
            ty,
            optional: false,
            location,
        }
    }

    pub fn optional_field(
        &self,
        module: ModuleId,
        name: &str,
        ty: TypeId,
        location: Location,
    ) -> Field {
        Field {
            optional: true,
            ..self.field(module, name, ty, location)
        }
    }

    pub fn enum_item(
        &self,
        module: ModuleId,
        name: &str,
        value: Option<i64>,
        location: Location,
    ) -> EnumItem {
        EnumItem {
            name: self.intern(module, name),
            value,
            location,
        }
    }

    pub fn set_subtype(&mut self, ty: TypeId, subtype: Subtype) {
        self.graph.ty_mut(ty).subtype = Some(subtype);
    }

    pub fn value(&mut self, module: ModuleId, kind: ValueKind, location: Location) -> ValueId {
        let id = ValueId::from_len(self.graph.values.len());
        self.graph.values.push(ValueData {
            kind,
            location,
            module,
            erroneous: false,
        });
        id
    }

    /// Value consisting of a single reference.
    pub fn value_ref(&mut self, scope: ScopeId, path: &str, location: Location) -> ValueId {
        let reference = self.reference(scope, path, location);
        let module = self.graph.scope(scope).module;
        self.value(module, ValueKind::Reference(reference), location)
    }

    /// Named field (or plain name) sub-reference.
    pub fn field_sub(&self, scope: ScopeId, name: &str, location: Location) -> SubReference {
        SubReference::Field {
            name: self.intern_in_scope(scope, name),
            location,
        }
    }

    pub fn index_sub(&self, index: ValueId, location: Location) -> SubReference {
        SubReference::Array { index, location }
    }

    /// `name(actuals..)` sub-reference.
    pub fn call_sub(
        &self,
        scope: ScopeId,
        name: &str,
        actuals: Vec<ActualParameter>,
        location: Location,
    ) -> SubReference {
        SubReference::Parameterized {
            name: self.intern_in_scope(scope, name),
            actuals,
            location,
        }
    }

    /// Reference made of dot-separated field segments, e.g. `r.a.b`.
    ///
    /// Whether a leading segment names a module is decided at resolution.
    pub fn reference(&mut self, scope: ScopeId, path: &str, location: Location) -> ReferenceId {
        let subrefs = path
            .split('.')
            .map(|segment| self.field_sub(scope, segment, location))
            .collect();
        self.reference_with(scope, None, subrefs, location)
    }

    /// Reference with an explicit module qualifier and arbitrary segments.
    pub fn reference_with(
        &mut self,
        scope: ScopeId,
        module: Option<&str>,
        subrefs: Vec<SubReference>,
        location: Location,
    ) -> ReferenceId {
        let module = module.map(|m| self.intern_in_scope(scope, m));
        let id = ReferenceId::from_len(self.graph.references.len());
        self.graph.references.push(ReferenceData {
            module,
            subrefs,
            location,
            scope,
            qualifier_split: false,
            cache: None,
        });
        id
    }

    /// Declare a named definition in `scope`.
    ///
    /// A repeated name is kept in the table's iteration order but stays
    /// unreachable by lookup.
    pub fn define(&mut self, scope: ScopeId, definition: Definition) -> AssignmentId {
        let module = self.graph.scope(scope).module;
        let name = self.intern(module, &definition.name);
        let id = AssignmentId::from_len(self.graph.assignments.len());
        self.graph.assignments.push(AssignmentData {
            name,
            location: definition.location,
            kind: definition.kind,
            scope,
            module,
            visibility: definition.visibility,
            ty: definition.ty,
            value: definition.value,
            formal_parameters: definition.formal_parameters,
            body: definition.body,
            last_checked: None,
            used: false,
            erroneous: false,
            referencing_modules: Default::default(),
        });
        self.graph
            .scope_mut(scope)
            .assignments_mut()
            .insert(name, id);

        if let Some(ty) = definition.ty {
            let data = self.graph.ty_mut(ty);
            if matches!(data.owner, TypeOwner::Anonymous(_)) {
                data.owner = TypeOwner::Assignment(id);
            }
        }
        for owned in [definition.formal_parameters, definition.body]
            .into_iter()
            .flatten()
        {
            self.graph.scope_mut(owned).owner = Some(id);
        }
        id
    }

    pub fn statement(&mut self, scope: ScopeId, kind: StatementKind, location: Location) {
        self.graph
            .scope_mut(scope)
            .push_statement(Statement { kind, location });
    }

    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }

    pub fn finish(self) -> ModuleGraph {
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
