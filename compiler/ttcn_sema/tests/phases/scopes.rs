//! Lookup through nested scopes, imports and visibility.

use pretty_assertions::assert_eq;
use ttcn_diagnostic::{ErrorCode, Severity};
use ttcn_sema::{
    AssignmentKind, CheckConfig, Definition, ScopeKind, StatementKind, TypeKind, ValueKind,
    Visibility,
};

use crate::common::{check, check_with, codes, messages, Project};

#[test]
fn duplicate_type_reports_both_and_keeps_the_first() {
    let mut p = Project::new();
    let (_, root) = p.ttcn("M");
    let first_ty = p.ty(root, TypeKind::Integer);
    let first = p.type_def(root, "R", first_ty);
    let second_ty = p.ty(root, TypeKind::Boolean);
    let second = p.type_def(root, "R", second_ty);
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert_eq!(result.count(ErrorCode::E2004), 2);

    let locations: Vec<_> = result
        .with_code(ErrorCode::E2004)
        .filter_map(|d| d.primary_location())
        .collect();
    assert_eq!(
        locations,
        vec![
            graph.assignment(first).location,
            graph.assignment(second).location
        ]
    );

    let name = graph.identifiers().lookup("R").unwrap();
    assert_eq!(graph.scope(root).assignments().get(name), Some(first));
}

#[test]
fn shadowing_in_nested_blocks_is_reported_and_innermost_wins() {
    let mut p = Project::new();
    let (_, root) = p.ttcn("M");
    let one = p.value(root, ValueKind::Integer(1));
    p.int_const(root, "c_x", one);

    let (_, body) = p.function(root, "f_main", None);
    let two = p.value(body, ValueKind::Integer(2));
    let ty = p.ty(body, TypeKind::Integer);
    p.define_value(body, AssignmentKind::Var, "c_x", ty, Some(two));

    let block_at = p.span(8);
    let block = p.b.scope(body, ScopeKind::StatementBlock, block_at);
    let three = p.value(block, ValueKind::Integer(3));
    let ty = p.ty(block, TypeKind::Integer);
    let innermost = p.define_value(block, AssignmentKind::Var, "c_x", ty, Some(three));
    let used = p.value_ref(block, "c_x");
    let at = p.at();
    p.b.statement(block, StatementKind::Evaluate(used), at);
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert_eq!(codes(&result), vec![ErrorCode::E2012, ErrorCode::E2012]);

    let ValueKind::Reference(reference) = graph.value(used).kind else {
        panic!("expected a reference value");
    };
    assert_eq!(graph.reference(reference).resolved(), Some(innermost));
}

#[test]
fn qualified_reference_reaches_an_imported_module() {
    let mut p = Project::new();
    let (_, m_root) = p.ttcn("Lib");
    let five = p.value(m_root, ValueKind::Integer(5));
    let c_five = p.int_const(m_root, "c_five", five);

    let (n, n_root) = p.ttcn("App");
    p.import(n, "Lib");
    let used = p.value_ref(n_root, "Lib.c_five");
    let c_copy = p.int_const(n_root, "c_copy", used);
    let mut graph = p.finish();

    let result = check(&mut graph);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert!(graph.assignment(c_five).is_used());
    assert!(!graph.assignment(c_copy).is_erroneous());
    assert!(graph.module(n).imports[0].is_used());
}

#[test]
fn private_definitions_stay_inside_their_module() {
    let mut p = Project::new();
    let (_, m_root) = p.ttcn("Lib");
    let five = p.value(m_root, ValueKind::Integer(5));
    let ty = p.ty(m_root, TypeKind::Integer);
    let at = p.at();
    p.b.define(
        m_root,
        Definition::new(AssignmentKind::Const, "c_secret", at)
            .with_type(ty)
            .with_value(five)
            .with_visibility(Visibility::Private),
    );

    let (n, n_root) = p.ttcn("App");
    p.import(n, "Lib");
    let used = p.value_ref(n_root, "c_secret");
    p.int_const(n_root, "c_copy", used);
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert_eq!(codes(&result), vec![ErrorCode::E2011]);
}

#[test]
fn unknown_names_are_reported_once() {
    let mut p = Project::new();
    let (_, root) = p.ttcn("M");
    let first = p.value_ref(root, "c_missing");
    p.int_const(root, "c_a", first);
    let (_, body) = p.function(root, "f_main", None);
    let second = p.value_ref(body, "c_missing");
    let at = p.at();
    p.b.statement(body, StatementKind::Evaluate(second), at);
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    // Two distinct references, one report each.
    assert_eq!(result.count(ErrorCode::E2003), 2);
    for message in messages(&result, ErrorCode::E2003) {
        assert!(message.contains("c_missing"), "{message}");
    }
}

#[test]
fn import_of_an_unknown_module_is_an_error() {
    let mut p = Project::new();
    let (m, _) = p.ttcn("M");
    p.import(m, "Nowhere");
    let mut graph = p.finish();

    let result = check(&mut graph);
    assert_eq!(codes(&result), vec![ErrorCode::E2009]);
    assert_eq!(result.diagnostics[0].severity, Severity::Error);
}

#[test]
fn asn_spelling_meets_ttcn_spelling() {
    let mut p = Project::new();
    let (_, asn_root) = p.asn("My-Types");
    let int = p.ty(asn_root, TypeKind::Integer);
    let small = p.type_def(asn_root, "Small-Int", int);

    let (app, app_root) = p.ttcn("App");
    p.import(app, "My_Types");
    let ty = p.type_ref(app_root, "Small_Int");
    let seven = p.value(app_root, ValueKind::Integer(7));
    p.define_value(app_root, AssignmentKind::Const, "c_seven", ty, Some(seven));
    let mut graph = p.finish();

    let result = check(&mut graph);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert!(graph.assignment(small).is_used());
    assert_eq!(graph.module_name(graph.module_ids().next().unwrap()), "My-Types");
}
