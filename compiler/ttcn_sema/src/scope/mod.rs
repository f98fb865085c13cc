//! Scope graph: the nesting hierarchy and the name-lookup walk.
//!
//! Every scope has one parent (the module root has none) and records its
//! children together with the source interval each one occupies. Children
//! are kept ordered by end offset and non-overlapping, so the smallest scope
//! enclosing an offset is found by repeated binary search.

use ttcn_ir::{AssignmentId, Dialect, Identifier, Location, ModuleId, ScopeId, Span};

use crate::graph::{ModuleGraph, Statement};
use crate::symbols::{AssignmentTable, Visibility};

/// Role of a scope in the hierarchy.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ScopeKind {
    /// Root scope of a module.
    Module,
    /// Formal parameter list of a parameterized declaration.
    FormalParameters,
    /// `{ ... }` block of statements and local definitions.
    StatementBlock,
    /// Body of a `for`/`while`/`do-while` loop.
    LoopBody,
    FunctionBody,
    AltstepBody,
    /// Definitions of a component type.
    ComponentBody,
    /// Injects `name` into the naming chain; never searched for names.
    NamingBridge { name: Identifier },
}

#[derive(Clone, Debug)]
pub struct ScopeData {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub module: ModuleId,
    pub location: Location,
    /// Declaration this scope belongs to (parameter lists and bodies).
    pub owner: Option<AssignmentId>,
    children: Vec<(Span, ScopeId)>,
    assignments: AssignmentTable,
    statements: Vec<Statement>,
    pub(crate) last_checked: Option<ttcn_ir::Timestamp>,
}

impl ScopeData {
    pub(crate) fn new(
        kind: ScopeKind,
        parent: Option<ScopeId>,
        module: ModuleId,
        location: Location,
    ) -> Self {
        ScopeData {
            kind,
            parent,
            module,
            location,
            owner: None,
            children: Vec::new(),
            assignments: AssignmentTable::new(),
            statements: Vec::new(),
            last_checked: None,
        }
    }

    /// Whether the scope owns a searchable declaration table.
    pub fn is_assignments(&self) -> bool {
        !matches!(self.kind, ScopeKind::NamingBridge { .. })
    }

    pub fn assignments(&self) -> &AssignmentTable {
        &self.assignments
    }

    pub(crate) fn assignments_mut(&mut self) -> &mut AssignmentTable {
        &mut self.assignments
    }

    pub fn children(&self) -> impl Iterator<Item = (Span, ScopeId)> + '_ {
        self.children.iter().copied()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub(crate) fn push_statement(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Record a child scope occupying `span`.
    ///
    /// Keeps children ordered by end offset. Adding the same child twice is a
    /// no-op.
    pub fn add_child(&mut self, span: Span, child: ScopeId) {
        if self.children.iter().any(|&(_, c)| c == child) {
            return;
        }
        let at = self.children.partition_point(|&(s, _)| s.end <= span.end);
        self.children.insert(at, (span, child));
    }

    /// Child whose interval strictly contains `offset`.
    pub fn child_enclosing(&self, offset: u32) -> Option<ScopeId> {
        // First child ending after the offset; earlier ones end too soon.
        let at = self.children.partition_point(|&(s, _)| s.end <= offset);
        self.children
            .get(at)
            .filter(|(span, _)| span.encloses(offset))
            .map(|&(_, child)| child)
    }
}

/// Outcome of the pure name-lookup walk.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Lookup {
    /// Found in the scope or one of its ancestors.
    Local(AssignmentId),
    /// Found in the module at position `import` of the import list.
    Imported { target: AssignmentId, import: usize },
    /// Only definitions invisible to the requester carry the name.
    NotVisible(AssignmentId),
    NotFound,
}

impl ModuleGraph {
    /// Smallest scope below `scope` whose interval strictly contains
    /// `offset`; `scope` itself when no child does.
    pub fn smallest_enclosing_scope(&self, scope: ScopeId, offset: u32) -> ScopeId {
        let mut current = scope;
        while let Some(child) = self.scope(current).child_enclosing(offset) {
            current = child;
        }
        current
    }

    /// Start scope for usage searches.
    ///
    /// Loop bodies are searched together with the construct around them, and
    /// function/altstep bodies together with their formal parameter lists.
    /// Naming bridges are never searched on their own.
    pub fn search_scope(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        loop {
            let data = self.scope(current);
            let Some(parent) = data.parent else {
                return current;
            };
            let parent_kind = self.scope(parent).kind;
            let promote = match data.kind {
                ScopeKind::LoopBody | ScopeKind::NamingBridge { .. } => true,
                ScopeKind::FunctionBody | ScopeKind::AltstepBody => {
                    parent_kind == ScopeKind::FormalParameters
                }
                _ => false,
            };
            if !promote {
                return current;
            }
            current = parent;
        }
    }

    /// Root scope of the module `scope` belongs to.
    pub fn module_scope(&self, scope: ScopeId) -> ScopeId {
        self.module(self.scope(scope).module).scope
    }

    /// Local table lookup, without walking to the parent.
    pub fn lookup_local(&self, scope: ScopeId, name: Identifier) -> Option<AssignmentId> {
        let data = self.scope(scope);
        if data.is_assignments() {
            data.assignments().get(name)
        } else {
            None
        }
    }

    /// Walk from `scope` up to its module root.
    pub fn lookup_lexical(&self, scope: ScopeId, name: Identifier) -> Option<AssignmentId> {
        let mut current = Some(scope);
        while let Some(s) = current {
            if let Some(found) = self.lookup_local(s, name) {
                return Some(found);
            }
            current = self.scope(s).parent;
        }
        None
    }

    /// Whether `target` may be referenced from module `requester`.
    pub fn is_visible(&self, requester: ModuleId, target: AssignmentId) -> bool {
        let data = self.assignment(target);
        if data.module == requester {
            return true;
        }
        let owner = self.module(data.module);
        // Only module-level definitions are importable.
        if data.scope != owner.scope {
            return false;
        }
        match owner.dialect {
            Dialect::Asn1 => owner.export_rule.exports(data.name),
            Dialect::Ttcn | Dialect::Internal => match data.visibility {
                Visibility::Public => true,
                Visibility::Friend => owner.friends.contains(&self.module(requester).name),
                Visibility::Private => false,
            },
        }
    }

    /// Full lookup for an unqualified name: lexical walk, then the imports
    /// of the module in import order.
    pub fn resolve_in_scope(&self, scope: ScopeId, name: Identifier) -> Lookup {
        if let Some(found) = self.lookup_lexical(scope, name) {
            return Lookup::Local(found);
        }

        let requester = self.scope(scope).module;
        let mut hidden = None;
        for (index, import) in self.module(requester).imports.iter().enumerate() {
            let Some(imported) = import.resolved else {
                continue;
            };
            let Some(target) = self.lookup_local(self.module(imported).scope, name) else {
                continue;
            };
            if self.is_visible(requester, target) {
                return Lookup::Imported {
                    target,
                    import: index,
                };
            }
            hidden.get_or_insert(target);
        }
        hidden.map_or(Lookup::NotFound, Lookup::NotVisible)
    }

    /// Lookup of `name` directly in the root scope of `module`, on behalf of
    /// `requester`.
    pub fn resolve_in_module(
        &self,
        module: ModuleId,
        name: Identifier,
        requester: ModuleId,
    ) -> Lookup {
        match self.lookup_local(self.module(module).scope, name) {
            Some(target) if self.is_visible(requester, target) => Lookup::Local(target),
            Some(target) => Lookup::NotVisible(target),
            None => Lookup::NotFound,
        }
    }

    /// Dotted naming path of a scope.
    ///
    /// Parameter lists and bodies take the name of the declaration owning
    /// them; a naming bridge restarts the chain with its own name.
    pub fn scope_path(&self, scope: ScopeId) -> String {
        let data = self.scope(scope);
        match data.kind {
            ScopeKind::Module => self.module_name(data.module).to_owned(),
            ScopeKind::NamingBridge { name } => self.display_in(data.module, name).to_owned(),
            _ => match (data.owner, data.parent) {
                (Some(owner), _) => self.full_name(owner),
                (None, Some(parent)) => self.scope_path(parent),
                (None, None) => self.module_name(data.module).to_owned(),
            },
        }
    }

    /// Dotted full name of a declaration, e.g. `M.f_main.v_x`.
    pub fn full_name(&self, id: AssignmentId) -> String {
        let data = self.assignment(id);
        format!("{}.{}", self.scope_path(data.scope), self.assignment_name(id))
    }
}
