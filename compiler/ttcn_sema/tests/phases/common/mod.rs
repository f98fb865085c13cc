//! Shared helpers for building module graphs and running a pass.
//!
//! [`Project`] wraps a [`GraphBuilder`] and hands out fresh, non-overlapping
//! source locations so tests only spell out what they care about.

use ttcn_diagnostic::ErrorCode;
use ttcn_ir::{
    AssignmentId, Dialect, Location, ModuleId, ScopeId, SourceId, Timestamp, TypeId, ValueId,
};
use ttcn_sema::{
    check_modules, AssignmentKind, CheckConfig, CheckResult, Definition, GraphBuilder,
    ModuleGraph, ScopeKind, TypeKind, ValueKind,
};

pub struct Project {
    pub b: GraphBuilder,
    next: u32,
}

impl Project {
    pub fn new() -> Self {
        Project {
            b: GraphBuilder::new(),
            next: 0,
        }
    }

    /// A fresh location after every location handed out so far.
    pub fn at(&mut self) -> Location {
        let start = self.next;
        self.next += 10;
        Location::at(SourceId::new(1), start, start + 5)
    }

    /// A location wide enough to hold `children` later locations.
    pub fn span(&mut self, children: u32) -> Location {
        let start = self.next;
        let end = start + 10 * (children + 1);
        self.next += 5;
        Location::at(SourceId::new(1), start, end)
    }

    pub fn ttcn(&mut self, name: &str) -> (ModuleId, ScopeId) {
        let at = self.at();
        let module = self.b.module(name, Dialect::Ttcn, at);
        (module, self.b.root_scope(module))
    }

    pub fn asn(&mut self, name: &str) -> (ModuleId, ScopeId) {
        let at = self.at();
        let module = self.b.module(name, Dialect::Asn1, at);
        (module, self.b.root_scope(module))
    }

    pub fn import(&mut self, module: ModuleId, from: &str) {
        let at = self.at();
        self.b.import(module, from, at);
    }

    pub fn module_of(&self, scope: ScopeId) -> ModuleId {
        self.b.graph().scope(scope).module
    }

    pub fn ty(&mut self, scope: ScopeId, kind: TypeKind) -> TypeId {
        let module = self.module_of(scope);
        let at = self.at();
        self.b.ty(module, kind, at)
    }

    pub fn type_ref(&mut self, scope: ScopeId, path: &str) -> TypeId {
        let at = self.at();
        self.b.type_ref(scope, path, at)
    }

    pub fn value(&mut self, scope: ScopeId, kind: ValueKind) -> ValueId {
        let module = self.module_of(scope);
        let at = self.at();
        self.b.value(module, kind, at)
    }

    pub fn value_ref(&mut self, scope: ScopeId, path: &str) -> ValueId {
        let at = self.at();
        self.b.value_ref(scope, path, at)
    }

    /// `type <ty> <name>;`
    pub fn type_def(&mut self, scope: ScopeId, name: &str, ty: TypeId) -> AssignmentId {
        let at = self.at();
        self.b.define(
            scope,
            Definition::new(AssignmentKind::Type, name, at).with_type(ty),
        )
    }

    /// `<kind> <ty> <name> := <value>;`
    pub fn define_value(
        &mut self,
        scope: ScopeId,
        kind: AssignmentKind,
        name: &str,
        ty: TypeId,
        value: Option<ValueId>,
    ) -> AssignmentId {
        let at = self.at();
        let mut definition = Definition::new(kind, name, at).with_type(ty);
        if let Some(value) = value {
            definition = definition.with_value(value);
        }
        self.b.define(scope, definition)
    }

    /// `const integer <name> := <value>;`
    pub fn int_const(&mut self, scope: ScopeId, name: &str, value: ValueId) -> AssignmentId {
        let ty = self.ty(scope, TypeKind::Integer);
        self.define_value(scope, AssignmentKind::Const, name, ty, Some(value))
    }

    /// `function <name>() [return <ret>] { ... }` with an empty body scope.
    pub fn function(
        &mut self,
        scope: ScopeId,
        name: &str,
        ret: Option<TypeId>,
    ) -> (AssignmentId, ScopeId) {
        let body_at = self.span(20);
        let body = self.b.scope(scope, ScopeKind::FunctionBody, body_at);
        let at = self.at();
        let mut definition = Definition::new(AssignmentKind::Function, name, at).with_body(body);
        if let Some(ret) = ret {
            definition = definition.with_type(ret);
        }
        (self.b.define(scope, definition), body)
    }

    pub fn finish(self) -> ModuleGraph {
        self.b.finish()
    }
}

/// Run a pass with the default configuration.
pub fn check(graph: &mut ModuleGraph) -> CheckResult {
    check_with(graph, &CheckConfig::default())
}

pub fn check_with(graph: &mut ModuleGraph, config: &CheckConfig) -> CheckResult {
    check_modules(graph, config, Timestamp::new(1))
}

/// Messages of every diagnostic with `code`, in report order.
pub fn messages(result: &CheckResult, code: ErrorCode) -> Vec<String> {
    result.with_code(code).map(|d| d.message.clone()).collect()
}

/// Codes of every diagnostic, in report order.
pub fn codes(result: &CheckResult) -> Vec<ErrorCode> {
    result.diagnostics.iter().map(|d| d.code).collect()
}
