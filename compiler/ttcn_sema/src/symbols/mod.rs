//! Symbol table: named declarations and the per-scope tables owning them.

use rustc_hash::FxHashMap;
use ttcn_ir::{AssignmentId, Identifier, Location};

/// Direction and flavour of a formal parameter.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ParameterKind {
    ValueIn,
    ValueOut,
    ValueInOut,
    TemplateIn,
    TemplateOut,
    TemplateInOut,
    Timer,
    Port,
}

impl ParameterKind {
    /// Whether the actual parameter must be a writable reference.
    pub fn is_by_reference(self) -> bool {
        matches!(
            self,
            ParameterKind::ValueOut
                | ParameterKind::ValueInOut
                | ParameterKind::TemplateOut
                | ParameterKind::TemplateInOut
        )
    }

    pub fn description(self) -> &'static str {
        match self {
            ParameterKind::ValueIn => "`in` value parameter",
            ParameterKind::ValueOut => "`out` value parameter",
            ParameterKind::ValueInOut => "`inout` value parameter",
            ParameterKind::TemplateIn => "`in` template parameter",
            ParameterKind::TemplateOut => "`out` template parameter",
            ParameterKind::TemplateInOut => "`inout` template parameter",
            ParameterKind::Timer => "timer parameter",
            ParameterKind::Port => "port parameter",
        }
    }
}

/// Concrete kind of a named declaration.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AssignmentKind {
    Type,
    Const,
    ExternalConst,
    ModulePar,
    Template,
    Var,
    VarTemplate,
    Timer,
    Port,
    Function,
    ExternalFunction,
    Altstep,
    Testcase,
    Parameter(ParameterKind),
    /// ASN.1 value set assignment.
    AsnValueSet,
    /// ASN.1 information object.
    AsnObject,
    /// ASN.1 information object class.
    AsnObjectClass,
    /// ASN.1 information object set.
    AsnObjectSet,
}

impl AssignmentKind {
    /// Human readable description used in diagnostics.
    pub fn description(self) -> &'static str {
        match self {
            AssignmentKind::Type => "type",
            AssignmentKind::Const => "constant",
            AssignmentKind::ExternalConst => "external constant",
            AssignmentKind::ModulePar => "module parameter",
            AssignmentKind::Template => "template",
            AssignmentKind::Var => "variable",
            AssignmentKind::VarTemplate => "template variable",
            AssignmentKind::Timer => "timer",
            AssignmentKind::Port => "port",
            AssignmentKind::Function => "function",
            AssignmentKind::ExternalFunction => "external function",
            AssignmentKind::Altstep => "altstep",
            AssignmentKind::Testcase => "testcase",
            AssignmentKind::Parameter(kind) => kind.description(),
            AssignmentKind::AsnValueSet => "value set",
            AssignmentKind::AsnObject => "information object",
            AssignmentKind::AsnObjectClass => "information object class",
            AssignmentKind::AsnObjectSet => "information object set",
        }
    }

    /// Whether a reference to this declaration denotes a value or template.
    pub fn is_value_like(self) -> bool {
        match self {
            AssignmentKind::Const
            | AssignmentKind::ExternalConst
            | AssignmentKind::ModulePar
            | AssignmentKind::Template
            | AssignmentKind::Var
            | AssignmentKind::VarTemplate
            | AssignmentKind::Function
            | AssignmentKind::ExternalFunction
            | AssignmentKind::AsnObject => true,
            AssignmentKind::Parameter(kind) => {
                !matches!(kind, ParameterKind::Timer | ParameterKind::Port)
            }
            _ => false,
        }
    }

    /// Whether the declaration can be the target of an assignment statement.
    pub fn is_writable(self) -> bool {
        match self {
            AssignmentKind::Var | AssignmentKind::VarTemplate => true,
            AssignmentKind::Parameter(kind) => {
                !matches!(kind, ParameterKind::Timer | ParameterKind::Port)
            }
            _ => false,
        }
    }

    /// Whether the value of this declaration is fixed at compile time and
    /// can be unfolded through references.
    pub fn is_foldable(self) -> bool {
        matches!(
            self,
            AssignmentKind::Const | AssignmentKind::ModulePar | AssignmentKind::Template
        )
    }

    pub fn is_timer(self) -> bool {
        matches!(
            self,
            AssignmentKind::Timer | AssignmentKind::Parameter(ParameterKind::Timer)
        )
    }

    pub fn is_port(self) -> bool {
        matches!(
            self,
            AssignmentKind::Port | AssignmentKind::Parameter(ParameterKind::Port)
        )
    }

    /// Whether the declaration takes a formal parameter list.
    pub fn is_parameterizable(self) -> bool {
        matches!(
            self,
            AssignmentKind::Function
                | AssignmentKind::ExternalFunction
                | AssignmentKind::Altstep
                | AssignmentKind::Testcase
                | AssignmentKind::Template
                | AssignmentKind::Type
        )
    }
}

/// TTCN-3 visibility of a module-level definition.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Friend,
    Private,
}

/// ASN.1 `EXPORTS` clause.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub enum ExportRule {
    /// No clause, or `EXPORTS ALL`.
    #[default]
    All,
    /// `EXPORTS a, b, c;`
    Symbols(Vec<Identifier>),
}

impl ExportRule {
    pub fn exports(&self, name: Identifier) -> bool {
        match self {
            ExportRule::All => true,
            ExportRule::Symbols(names) => names.contains(&name),
        }
    }
}

/// Ordered, name-unique table of declarations owned by one scope.
///
/// Every inserted declaration stays in iteration order. Only the first one
/// of a given name is reachable through lookup; later ones are recorded as
/// duplicates.
#[derive(Clone, Debug, Default)]
pub struct AssignmentTable {
    order: Vec<AssignmentId>,
    by_name: FxHashMap<Identifier, AssignmentId>,
    duplicates: Vec<Duplicate>,
}

/// A declaration whose name was already taken in the same table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Duplicate {
    pub first: AssignmentId,
    pub repeated: AssignmentId,
}

impl AssignmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration. Returns the earlier declaration of the same
    /// name, if any.
    pub fn insert(&mut self, name: Identifier, id: AssignmentId) -> Option<AssignmentId> {
        self.order.push(id);
        match self.by_name.get(&name) {
            Some(&first) => {
                self.duplicates.push(Duplicate {
                    first,
                    repeated: id,
                });
                Some(first)
            }
            None => {
                self.by_name.insert(name, id);
                None
            }
        }
    }

    /// Look up a declaration by name (first insertion wins).
    pub fn get(&self, name: Identifier) -> Option<AssignmentId> {
        self.by_name.get(&name).copied()
    }

    /// Declaration at `index` in insertion order.
    pub fn at(&self, index: usize) -> Option<AssignmentId> {
        self.order.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = AssignmentId> + '_ {
        self.order.iter().copied()
    }

    pub fn duplicates(&self) -> &[Duplicate] {
        &self.duplicates
    }
}

/// Input for [`GraphBuilder::define`](crate::GraphBuilder::define).
#[derive(Clone, Debug)]
pub struct Definition {
    pub kind: AssignmentKind,
    pub name: String,
    pub location: Location,
    pub visibility: Visibility,
    pub ty: Option<ttcn_ir::TypeId>,
    pub value: Option<ttcn_ir::ValueId>,
    pub formal_parameters: Option<ttcn_ir::ScopeId>,
    pub body: Option<ttcn_ir::ScopeId>,
}

impl Definition {
    pub fn new(kind: AssignmentKind, name: impl Into<String>, location: Location) -> Self {
        Definition {
            kind,
            name: name.into(),
            location,
            visibility: Visibility::Public,
            ty: None,
            value: None,
            formal_parameters: None,
            body: None,
        }
    }

    /// Formal parameter declaration.
    pub fn parameter(kind: ParameterKind, name: impl Into<String>, location: Location) -> Self {
        Self::new(AssignmentKind::Parameter(kind), name, location)
    }

    #[must_use]
    pub fn with_type(mut self, ty: ttcn_ir::TypeId) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Initial value, constant value or default parameter value.
    #[must_use]
    pub fn with_value(mut self, value: ttcn_ir::ValueId) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, scope: ttcn_ir::ScopeId) -> Self {
        self.formal_parameters = Some(scope);
        self
    }

    #[must_use]
    pub fn with_body(mut self, scope: ttcn_ir::ScopeId) -> Self {
        self.body = Some(scope);
        self
    }
}
