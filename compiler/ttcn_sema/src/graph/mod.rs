//! The module graph: arenas of every node the checker works on.
//!
//! Modules, scopes, declarations, types, values and references each live in
//! their own arena and refer to each other by handle. The graph is produced
//! by a parser (or by [`GraphBuilder`] in tests) and then annotated in place
//! by check passes: timestamps, used flags, resolution caches and erroneous
//! marks.

mod builder;
mod types;
mod values;

pub use builder::GraphBuilder;
pub use types::{AsnStringKind, EnumItem, Field, TypeData, TypeKind, TypeOwner};
pub use values::{BinaryOp, NamedValue, UnaryOp, ValueData, ValueKind, Verdict};

use rustc_hash::{FxHashMap, FxHashSet};
use ttcn_ir::{
    AssignmentId, Dialect, Identifier, Location, ModuleId, ReferenceId, ScopeId,
    SharedIdentifierTable, Timestamp, TypeId, ValueId,
};

use crate::scope::ScopeData;
use crate::symbols::{AssignmentKind, ExportRule, Visibility};

/// `import from M all;`
#[derive(Clone, Debug)]
pub struct Import {
    pub module_name: Identifier,
    pub location: Location,
    pub(crate) resolved: Option<ModuleId>,
    pub(crate) used: bool,
}

impl Import {
    pub fn resolved(&self) -> Option<ModuleId> {
        self.resolved
    }

    pub fn is_used(&self) -> bool {
        self.used
    }
}

#[derive(Clone, Debug)]
pub struct ModuleData {
    pub name: Identifier,
    pub dialect: Dialect,
    pub location: Location,
    /// Root scope holding the module-level definitions.
    pub scope: ScopeId,
    pub imports: Vec<Import>,
    /// Modules granted access to `friend` definitions.
    pub friends: Vec<Identifier>,
    pub export_rule: ExportRule,
}

impl ModuleData {
    pub fn is_asn(&self) -> bool {
        self.dialect == Dialect::Asn1
    }
}

/// A named declaration.
#[derive(Clone, Debug)]
pub struct AssignmentData {
    pub name: Identifier,
    pub location: Location,
    pub kind: AssignmentKind,
    pub scope: ScopeId,
    pub module: ModuleId,
    pub visibility: Visibility,
    /// Declared type; the return type of a function.
    pub ty: Option<TypeId>,
    /// Constant value, initial value or default parameter value.
    pub value: Option<ValueId>,
    pub formal_parameters: Option<ScopeId>,
    pub body: Option<ScopeId>,
    pub(crate) last_checked: Option<Timestamp>,
    pub(crate) used: bool,
    pub(crate) erroneous: bool,
    /// Modules holding at least one resolved reference to this declaration.
    pub(crate) referencing_modules: FxHashSet<ModuleId>,
}

impl AssignmentData {
    pub fn last_checked(&self) -> Option<Timestamp> {
        self.last_checked
    }

    pub fn is_used(&self) -> bool {
        self.used
    }

    pub fn is_erroneous(&self) -> bool {
        self.erroneous
    }

    pub fn referencing_modules(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.referencing_modules.iter().copied()
    }
}

/// One actual parameter of a parameterized sub-reference.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActualParameter {
    Value(ValueId),
    /// `-`: use the default value.
    NotUsed(Location),
}

/// One segment of a reference path.
#[derive(Clone, Debug, PartialEq)]
pub enum SubReference {
    Field {
        name: Identifier,
        location: Location,
    },
    Array {
        index: ValueId,
        location: Location,
    },
    Parameterized {
        name: Identifier,
        actuals: Vec<ActualParameter>,
        location: Location,
    },
}

impl SubReference {
    pub fn name(&self) -> Option<Identifier> {
        match self {
            SubReference::Field { name, .. } | SubReference::Parameterized { name, .. } => {
                Some(*name)
            }
            SubReference::Array { .. } => None,
        }
    }

    pub fn location(&self) -> Location {
        match self {
            SubReference::Field { location, .. }
            | SubReference::Array { location, .. }
            | SubReference::Parameterized { location, .. } => *location,
        }
    }
}

/// Cached outcome of resolving a reference under one timestamp.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Resolution {
    pub timestamp: Timestamp,
    pub target: Option<AssignmentId>,
}

#[derive(Clone, Debug)]
pub struct ReferenceData {
    /// Explicit module qualifier.
    pub module: Option<Identifier>,
    pub subrefs: Vec<SubReference>,
    pub location: Location,
    /// Scope the reference occurs in.
    pub scope: ScopeId,
    /// The leading sub-reference turned out to be a module qualifier.
    pub(crate) qualifier_split: bool,
    pub(crate) cache: Option<Resolution>,
}

impl ReferenceData {
    /// Module qualifier, explicit or detected.
    pub fn qualifier(&self) -> Option<Identifier> {
        match (self.module, self.qualifier_split) {
            (Some(module), _) => Some(module),
            (None, true) => self.subrefs.first().and_then(SubReference::name),
            (None, false) => None,
        }
    }

    /// Sub-references after the module qualifier.
    pub fn path(&self) -> &[SubReference] {
        if self.module.is_none() && self.qualifier_split {
            &self.subrefs[1..]
        } else {
            &self.subrefs
        }
    }

    /// Last resolution, whatever timestamp it was made under.
    pub fn last_resolution(&self) -> Option<Resolution> {
        self.cache
    }

    pub fn resolved(&self) -> Option<AssignmentId> {
        self.cache.and_then(|c| c.target)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StatementKind {
    /// `target := value`
    Assignment { target: ReferenceId, value: ValueId },
    /// Expression evaluated for its effect (e.g. a function call).
    Evaluate(ValueId),
    Return(Option<ValueId>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub location: Location,
}

/// Arena storage for one set of modules checked together.
#[derive(Clone)]
pub struct ModuleGraph {
    idents: SharedIdentifierTable,
    pub(crate) modules: Vec<ModuleData>,
    pub(crate) scopes: Vec<ScopeData>,
    pub(crate) assignments: Vec<AssignmentData>,
    pub(crate) types: Vec<TypeData>,
    pub(crate) values: Vec<ValueData>,
    pub(crate) references: Vec<ReferenceData>,
    /// First module of each name.
    module_by_name: FxHashMap<Identifier, ModuleId>,
    last_pass: Option<Timestamp>,
}

impl ModuleGraph {
    pub fn new(idents: SharedIdentifierTable) -> Self {
        ModuleGraph {
            idents,
            modules: Vec::new(),
            scopes: Vec::new(),
            assignments: Vec::new(),
            types: Vec::new(),
            values: Vec::new(),
            references: Vec::new(),
            module_by_name: FxHashMap::default(),
            last_pass: None,
        }
    }

    /// Forget the erroneous and used marks of earlier passes when
    /// `timestamp` starts a new one.
    pub(crate) fn begin_pass(&mut self, timestamp: Timestamp) {
        if timestamp.is_covered_by(self.last_pass) {
            return;
        }
        self.last_pass = Some(timestamp);
        for data in &mut self.assignments {
            data.erroneous = false;
            data.used = false;
            data.referencing_modules.clear();
        }
        for data in &mut self.types {
            data.erroneous = false;
        }
        for data in &mut self.values {
            data.erroneous = false;
        }
        for import in self.modules.iter_mut().flat_map(|m| m.imports.iter_mut()) {
            import.used = false;
        }
    }

    pub fn identifiers(&self) -> &SharedIdentifierTable {
        &self.idents
    }

    pub fn module(&self, id: ModuleId) -> &ModuleData {
        &self.modules[id.index()]
    }

    pub fn scope(&self, id: ScopeId) -> &ScopeData {
        &self.scopes[id.index()]
    }

    pub fn assignment(&self, id: AssignmentId) -> &AssignmentData {
        &self.assignments[id.index()]
    }

    pub fn ty(&self, id: TypeId) -> &TypeData {
        &self.types[id.index()]
    }

    pub fn value(&self, id: ValueId) -> &ValueData {
        &self.values[id.index()]
    }

    pub fn reference(&self, id: ReferenceId) -> &ReferenceData {
        &self.references[id.index()]
    }

    pub(crate) fn module_mut(&mut self, id: ModuleId) -> &mut ModuleData {
        &mut self.modules[id.index()]
    }

    pub(crate) fn scope_mut(&mut self, id: ScopeId) -> &mut ScopeData {
        &mut self.scopes[id.index()]
    }

    pub(crate) fn assignment_mut(&mut self, id: AssignmentId) -> &mut AssignmentData {
        &mut self.assignments[id.index()]
    }

    pub(crate) fn ty_mut(&mut self, id: TypeId) -> &mut TypeData {
        &mut self.types[id.index()]
    }

    pub(crate) fn value_mut(&mut self, id: ValueId) -> &mut ValueData {
        &mut self.values[id.index()]
    }

    pub(crate) fn reference_mut(&mut self, id: ReferenceId) -> &mut ReferenceData {
        &mut self.references[id.index()]
    }

    pub fn module_ids(&self) -> impl Iterator<Item = ModuleId> {
        (0..self.modules.len()).map(ModuleId::from_len)
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn module_by_name(&self, name: Identifier) -> Option<ModuleId> {
        self.module_by_name.get(&name).copied()
    }

    pub(crate) fn register_module_name(&mut self, name: Identifier, id: ModuleId) {
        self.module_by_name.entry(name).or_insert(id);
    }

    /// Display spelling of a name in the dialect of `module`.
    pub fn display_in(&self, module: ModuleId, name: Identifier) -> &'static str {
        self.idents.display(name, self.module(module).dialect)
    }

    /// Display name of a declaration, spelled in its module's dialect.
    pub fn assignment_name(&self, id: AssignmentId) -> &'static str {
        let data = self.assignment(id);
        self.display_in(data.module, data.name)
    }

    pub fn module_name(&self, id: ModuleId) -> &'static str {
        let data = self.module(id);
        self.idents.display(data.name, data.dialect)
    }

    /// Textual form of a reference, e.g. `M.r.field[..]`.
    pub fn reference_text(&self, id: ReferenceId) -> String {
        let data = self.reference(id);
        let module = self.scope(data.scope).module;
        let mut text = String::new();
        if let Some(qualifier) = data.module {
            text.push_str(self.display_in(module, qualifier));
        }
        for subref in &data.subrefs {
            match subref {
                SubReference::Field { name, .. } | SubReference::Parameterized { name, .. } => {
                    if !text.is_empty() {
                        text.push('.');
                    }
                    text.push_str(self.display_in(module, *name));
                    if matches!(subref, SubReference::Parameterized { .. }) {
                        text.push_str("(..)");
                    }
                }
                SubReference::Array { .. } => text.push_str("[..]"),
            }
        }
        text
    }

    /// Name of a type for diagnostics: the declaring name when it has one,
    /// the kind name otherwise.
    pub fn type_name(&self, id: TypeId) -> String {
        let data = self.ty(id);
        match data.owner {
            TypeOwner::Assignment(a) if self.assignment(a).kind == AssignmentKind::Type => {
                self.assignment_name(a).to_owned()
            }
            _ => match data.kind {
                TypeKind::Referenced(r) => self.reference_text(r),
                ref kind => kind.name(data.asn).to_owned(),
            },
        }
    }

    /// Dotted path naming a type through its naming parents.
    pub fn type_full_name(&self, id: TypeId) -> String {
        let data = self.ty(id);
        match data.owner {
            TypeOwner::Assignment(a) => self.full_name(a),
            TypeOwner::Field { parent, name } => {
                format!("{}.{}", self.type_full_name(parent), self.display_in(data.module, name))
            }
            TypeOwner::Element(parent) => format!("{}.<oftype>", self.type_full_name(parent)),
            TypeOwner::Anonymous(module) => {
                format!("{}.<{}>", self.module_name(module), self.type_name(id))
            }
        }
    }
}

impl std::fmt::Debug for ModuleGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleGraph")
            .field("modules", &self.modules.len())
            .field("scopes", &self.scopes.len())
            .field("assignments", &self.assignments.len())
            .field("types", &self.types.len())
            .field("values", &self.values.len())
            .field("references", &self.references.len())
            .finish()
    }
}
