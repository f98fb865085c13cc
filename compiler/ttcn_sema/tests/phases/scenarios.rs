//! Mixed projects: statements, calls, end-of-pass reports and repeated
//! passes.

use pretty_assertions::assert_eq;
use ttcn_diagnostic::{ErrorCode, Severity};
use ttcn_ir::{Location, ScopeId, Timestamp, ValueId};
use ttcn_sema::{
    find_references, ActualParameter, AssignmentKind, CheckConfig, Definition, ParameterKind,
    ReportLevel, ScopeKind, StatementKind, TypeKind, ValueKind, Visibility,
};

use crate::common::{check, check_with, codes, messages, Project};

fn statement(p: &mut Project, scope: ScopeId, kind: StatementKind) -> Location {
    let at = p.at();
    p.b.statement(scope, kind, at);
    at
}

fn assign(p: &mut Project, scope: ScopeId, target: &str, value: ValueId) {
    let at = p.at();
    let target = p.b.reference(scope, target, at);
    statement(p, scope, StatementKind::Assignment { target, value });
}

#[test]
fn unused_definitions_and_imports() {
    let mut p = Project::new();
    let (_, lib_root) = p.ttcn("Lib");
    let one = p.value(lib_root, ValueKind::Integer(1));
    p.int_const(lib_root, "c_lib", one);

    let (app, root) = p.ttcn("App");
    p.import(app, "Lib");
    let two = p.value(root, ValueKind::Integer(2));
    let ty = p.ty(root, TypeKind::Integer);
    let at = p.at();
    let hidden = p.b.define(
        root,
        Definition::new(AssignmentKind::Const, "c_hidden", at)
            .with_type(ty)
            .with_value(two),
    );
    let three = p.value(root, ValueKind::Integer(3));
    p.int_const(root, "c_public", three);

    let (_, body) = p.function(root, "f_main", None);
    let ty = p.ty(body, TypeKind::Integer);
    let unused = p.define_value(body, AssignmentKind::Var, "v_unused", ty, None);
    let ty = p.ty(body, TypeKind::Integer);
    p.define_value(body, AssignmentKind::Var, "v_used", ty, None);
    let used = p.value_ref(body, "v_used");
    statement(&mut p, body, StatementKind::Evaluate(used));
    let mut graph = p.finish();

    // `c_hidden` is public, so only the local variable and the import count.
    let result = check(&mut graph);
    assert_eq!(codes(&result), vec![ErrorCode::W1002, ErrorCode::W1001]);
    assert!(!result.has_errors());
    assert_eq!(
        result.with_code(ErrorCode::W1001).next().unwrap().primary_location(),
        Some(graph.assignment(unused).location)
    );
    assert!(messages(&result, ErrorCode::W1002)[0].contains("`Lib`"));
    assert!(!graph.assignment(hidden).is_used());
}

#[test]
fn private_module_definitions_must_be_used() {
    let mut p = Project::new();
    let (_, root) = p.ttcn("M");
    let one = p.value(root, ValueKind::Integer(1));
    let ty = p.ty(root, TypeKind::Integer);
    let at = p.at();
    p.b.define(
        root,
        Definition::new(AssignmentKind::Const, "c_private", at)
            .with_type(ty)
            .with_value(one)
            .with_visibility(Visibility::Private),
    );
    let mut graph = p.finish();

    let config = CheckConfig {
        unused_definition: ReportLevel::Error,
        ..CheckConfig::quiet()
    };
    let result = check_with(&mut graph, &config);
    assert_eq!(codes(&result), vec![ErrorCode::W1001]);
    assert_eq!(result.diagnostics[0].severity, Severity::Error);
}

#[test]
fn naming_conventions_skip_asn_modules() {
    let mut p = Project::new();
    let (_, asn_root) = p.asn("Asn-Types");
    let int = p.ty(asn_root, TypeKind::Integer);
    p.type_def(asn_root, "lower-case", int);

    let (_, root) = p.ttcn("M");
    let one = p.value(root, ValueKind::Integer(1));
    p.int_const(root, "bad", one);
    let int = p.ty(root, TypeKind::Integer);
    p.type_def(root, "lower", int);
    let (_, body) = p.function(root, "main", None);
    let ty = p.ty(body, TypeKind::Integer);
    p.define_value(body, AssignmentKind::Var, "v_fine", ty, None);
    let mut graph = p.finish();

    let config = CheckConfig {
        naming_convention: ReportLevel::Warning,
        ..CheckConfig::quiet()
    };
    let result = check_with(&mut graph, &config);
    assert_eq!(result.count(ErrorCode::W1003), 3);
    let found = messages(&result, ErrorCode::W1003);
    for name in ["bad", "lower", "main"] {
        assert!(found.iter().any(|m| m.contains(&format!("`{name}`"))), "{found:?}");
    }
    assert!(!result.has_errors());
}

#[test]
fn return_statements_match_their_function() {
    let mut p = Project::new();
    let (_, root) = p.ttcn("M");

    let ret = p.ty(root, TypeKind::Integer);
    let (_, ok) = p.function(root, "f_ok", Some(ret));
    let one = p.value(ok, ValueKind::Integer(1));
    statement(&mut p, ok, StatementKind::Return(Some(one)));

    let ret = p.ty(root, TypeKind::Integer);
    let (_, bare) = p.function(root, "f_bare", Some(ret));
    let bare_at = statement(&mut p, bare, StatementKind::Return(None));

    let ret = p.ty(root, TypeKind::Integer);
    let (_, text) = p.function(root, "f_text", Some(ret));
    let word = p.value(text, ValueKind::Charstring("x".into()));
    statement(&mut p, text, StatementKind::Return(Some(word)));

    let (_, void) = p.function(root, "f_void", None);
    let two = p.value(void, ValueKind::Integer(2));
    statement(&mut p, void, StatementKind::Return(Some(two)));

    let outside_at = statement(&mut p, root, StatementKind::Return(None));
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    let found = messages(&result, ErrorCode::E2010);
    assert_eq!(found.len(), 4, "{found:?}");
    assert!(found.iter().any(|m| m.contains("missing return value in function `f_bare`")));
    assert!(found.iter().any(|m| m.contains("function `f_void` does not return a value")));
    assert!(found.iter().any(|m| m.contains("`return` outside")));

    let locations: Vec<_> = result
        .diagnostics
        .iter()
        .filter_map(|d| d.primary_location())
        .collect();
    assert!(locations.contains(&bare_at));
    assert!(locations.contains(&outside_at));
}

#[test]
fn assignment_statements_need_writable_targets() {
    let mut p = Project::new();
    let (_, root) = p.ttcn("M");
    let one = p.value(root, ValueKind::Integer(1));
    p.int_const(root, "c_fixed", one);

    let (_, body) = p.function(root, "f_main", None);
    let ty = p.ty(body, TypeKind::Integer);
    p.define_value(body, AssignmentKind::Var, "v_x", ty, None);

    let two = p.value(body, ValueKind::Integer(2));
    assign(&mut p, body, "v_x", two);
    let three = p.value(body, ValueKind::Integer(3));
    assign(&mut p, body, "c_fixed", three);
    let word = p.value(body, ValueKind::Charstring("s".into()));
    assign(&mut p, body, "v_x", word);
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert_eq!(codes(&result), vec![ErrorCode::E2013, ErrorCode::E2010]);
    assert!(result.diagnostics[0].message.contains("`c_fixed` is a constant"));
}

#[test]
fn calls_with_parameters_across_modules() {
    let mut p = Project::new();
    let (_, lib_root) = p.ttcn("Lib");

    // function f_add(in integer pl_a, in integer pl_b := 0) return integer
    let params_at = p.span(6);
    let params = p.b.scope(lib_root, ScopeKind::FormalParameters, params_at);
    let body_at = p.span(4);
    let body = p.b.scope(params, ScopeKind::FunctionBody, body_at);
    let ty = p.ty(params, TypeKind::Integer);
    let at = p.at();
    p.b.define(
        params,
        Definition::parameter(ParameterKind::ValueIn, "pl_a", at).with_type(ty),
    );
    let ty = p.ty(params, TypeKind::Integer);
    let zero = p.value(params, ValueKind::Integer(0));
    let at = p.at();
    p.b.define(
        params,
        Definition::parameter(ParameterKind::ValueIn, "pl_b", at)
            .with_type(ty)
            .with_value(zero),
    );
    let result_ty = p.ty(body, TypeKind::Integer);
    let pl_a = p.value_ref(body, "pl_a");
    statement(&mut p, body, StatementKind::Return(Some(pl_a)));
    let at = p.at();
    let f_add = p.b.define(
        lib_root,
        Definition::new(AssignmentKind::Function, "f_add", at)
            .with_type(result_ty)
            .with_parameters(params)
            .with_body(body),
    );

    let (app, root) = p.ttcn("App");
    p.import(app, "Lib");
    let call = |p: &mut Project, actuals: Vec<i64>| {
        let actuals = actuals
            .into_iter()
            .map(|i| ActualParameter::Value(p.value(root, ValueKind::Integer(i))))
            .collect();
        let at = p.at();
        let segment = p.b.call_sub(root, "f_add", actuals, at);
        let at = p.at();
        let reference = p.b.reference_with(root, None, vec![segment], at);
        p.value(root, ValueKind::Reference(reference))
    };
    let fits = call(&mut p, vec![1]);
    p.int_const(root, "c_one", fits);
    let both = call(&mut p, vec![1, 2]);
    p.int_const(root, "c_both", both);
    let too_many = call(&mut p, vec![1, 2, 3]);
    p.int_const(root, "c_many", too_many);
    let mut graph = p.finish();

    let result = check(&mut graph);
    assert_eq!(codes(&result), vec![ErrorCode::E2007]);

    let found = find_references(&graph, f_add, lib_root);
    assert_eq!(found.len(), 4);
}

#[test]
fn repeated_passes_report_the_same() {
    let mut p = Project::new();
    let (_, root) = p.ttcn("M");
    let missing = p.value_ref(root, "c_missing");
    p.int_const(root, "c_a", missing);
    let me = p.value_ref(root, "c_self");
    p.int_const(root, "c_self", me);
    let mut graph = p.finish();

    let config = CheckConfig::quiet();
    let first = ttcn_sema::check_modules(&mut graph, &config, Timestamp::new(1));
    assert_eq!(codes(&first), vec![ErrorCode::E2003, ErrorCode::E2005]);

    // Everything is covered by the first timestamp.
    let again = ttcn_sema::check_modules(&mut graph, &config, Timestamp::new(1));
    assert!(again.diagnostics.is_empty(), "{:?}", again.diagnostics);

    let later = ttcn_sema::check_modules(&mut graph, &config, Timestamp::new(2));
    assert_eq!(later.diagnostics, first.diagnostics);
}
