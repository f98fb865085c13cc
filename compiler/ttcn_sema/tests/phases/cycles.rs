//! Circular values, types and imports.

use pretty_assertions::assert_eq;
use ttcn_diagnostic::{ErrorCode, Severity};
use ttcn_sema::{BinaryOp, CheckConfig, ReportLevel, TypeKind, ValueKind};

use crate::common::{check_with, codes, messages, Project};

fn no_import_reports() -> CheckConfig {
    CheckConfig {
        unused_import: ReportLevel::Ignore,
        ..CheckConfig::default()
    }
}

#[test]
fn three_constants_in_a_ring() {
    let mut p = Project::new();
    let (_, root) = p.ttcn("M");
    let to_b = p.value_ref(root, "c_b");
    let c_a = p.int_const(root, "c_a", to_b);
    let to_c = p.value_ref(root, "c_c");
    let c_b = p.int_const(root, "c_b", to_c);
    let to_a = p.value_ref(root, "c_a");
    let c_c = p.int_const(root, "c_c", to_a);
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert_eq!(codes(&result), vec![ErrorCode::E2005; 3]);
    for message in messages(&result, ErrorCode::E2005) {
        for name in ["c_a", "c_b", "c_c"] {
            assert!(message.contains(name), "{message}");
        }
    }
    for id in [c_a, c_b, c_c] {
        assert!(graph.assignment(id).is_erroneous());
    }
}

#[test]
fn constant_using_itself_is_reported_once() {
    let mut p = Project::new();
    let (_, root) = p.ttcn("M");
    let me = p.value_ref(root, "c_self");
    let one = p.value(root, ValueKind::Integer(1));
    let sum = p.value(root, ValueKind::Binary(BinaryOp::Add, me, one));
    let c_self = p.int_const(root, "c_self", sum);
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert_eq!(codes(&result), vec![ErrorCode::E2005]);
    assert!(messages(&result, ErrorCode::E2005)[0].contains("`c_self` -> `c_self`"));
    assert!(graph.assignment(c_self).is_erroneous());
}

#[test]
fn repeated_operand_is_not_a_cycle() {
    let mut p = Project::new();
    let (_, root) = p.ttcn("M");
    let left = p.value_ref(root, "c_b");
    let right = p.value_ref(root, "c_b");
    let sum = p.value(root, ValueKind::Binary(BinaryOp::Add, left, right));
    p.int_const(root, "c_a", sum);
    let one = p.value(root, ValueKind::Integer(1));
    p.int_const(root, "c_b", one);
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn diamond_of_constants_is_not_a_cycle() {
    let mut p = Project::new();
    let (_, root) = p.ttcn("M");
    let b = p.value_ref(root, "c_b");
    let c = p.value_ref(root, "c_c");
    let sum = p.value(root, ValueKind::Binary(BinaryOp::Add, b, c));
    p.int_const(root, "c_d", sum);
    let x = p.value_ref(root, "c_x");
    p.int_const(root, "c_b", x);
    let x = p.value_ref(root, "c_x");
    p.int_const(root, "c_c", x);
    let one = p.value(root, ValueKind::Integer(1));
    p.int_const(root, "c_x", one);
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn record_containing_itself() {
    let mut p = Project::new();
    let (m, root) = p.ttcn("M");
    let next_ty = p.type_ref(root, "R");
    let next = {
        let at = p.at();
        p.b.field(m, "next", next_ty, at)
    };
    let record = p.ty(root, TypeKind::Record(vec![next]));
    p.type_def(root, "R", record);
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    // One report per participant: the record and its field type.
    assert_eq!(codes(&result), vec![ErrorCode::E2005; 2]);
    assert!(graph.ty(record).is_erroneous());
}

#[test]
fn optional_field_breaks_the_recursion() {
    let mut p = Project::new();
    let (m, root) = p.ttcn("M");
    let next_ty = p.type_ref(root, "Node");
    let int = p.ty(root, TypeKind::Integer);
    let (value, next) = {
        let at = p.at();
        let value = p.b.field(m, "value", int, at);
        let at = p.at();
        (value, p.b.optional_field(m, "next", next_ty, at))
    };
    let record = p.ty(root, TypeKind::Record(vec![value, next]));
    p.type_def(root, "Node", record);

    let element = p.type_ref(root, "List");
    let list = p.ty(root, TypeKind::RecordOf(element));
    p.type_def(root, "List", list);
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert!(!graph.ty(record).is_erroneous());
}

#[test]
fn union_with_one_alternative_containing_itself() {
    let mut p = Project::new();
    let (m, root) = p.ttcn("M");
    let inner = p.type_ref(root, "U");
    let a = {
        let at = p.at();
        p.b.field(m, "a", inner, at)
    };
    let union = p.ty(root, TypeKind::Union(vec![a]));
    p.type_def(root, "U", union);
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert_eq!(codes(&result), vec![ErrorCode::E2005; 2]);
    assert!(graph.ty(union).is_erroneous());
}

#[test]
fn second_alternative_breaks_the_recursion() {
    let mut p = Project::new();
    let (m, root) = p.ttcn("M");
    let inner = p.type_ref(root, "U");
    let int = p.ty(root, TypeKind::Integer);
    let (a, b) = {
        let at = p.at();
        let a = p.b.field(m, "a", inner, at);
        let at = p.at();
        (a, p.b.field(m, "b", int, at))
    };
    let union = p.ty(root, TypeKind::Union(vec![a, b]));
    p.type_def(root, "U", union);
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert!(!graph.ty(union).is_erroneous());
}

#[test]
fn import_cycle_is_a_warning_by_default() {
    let mut p = Project::new();
    let (m, _) = p.ttcn("M");
    let (n, _) = p.ttcn("N");
    p.import(m, "N");
    p.import(n, "M");
    let mut graph = p.finish();

    let result = check_with(&mut graph, &no_import_reports());
    assert_eq!(codes(&result), vec![ErrorCode::E2006; 2]);
    assert!(result
        .with_code(ErrorCode::E2006)
        .all(|d| d.severity == Severity::Warning));
    assert!(!result.has_errors());

    let mut graph_strict = graph.clone();
    let strict = CheckConfig {
        circular_import: ReportLevel::Error,
        ..no_import_reports()
    };
    let timestamp = ttcn_ir::Timestamp::new(2);
    let result = ttcn_sema::check_modules(&mut graph_strict, &strict, timestamp);
    assert_eq!(result.error_count(), 2);

    let result = ttcn_sema::check_modules(&mut graph, &CheckConfig::quiet(), timestamp);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn longer_import_cycle_names_every_module() {
    let mut p = Project::new();
    let (a, _) = p.ttcn("A");
    let (b, _) = p.ttcn("B");
    let (c, _) = p.ttcn("C");
    let (d, _) = p.ttcn("D");
    p.import(a, "B");
    p.import(b, "C");
    p.import(c, "A");
    // Importing into the ring does not make `D` a participant.
    p.import(d, "A");
    let mut graph = p.finish();

    let result = check_with(&mut graph, &no_import_reports());
    let found = messages(&result, ErrorCode::E2006);
    assert_eq!(found.len(), 3);
    for message in &found {
        assert!(message.contains("`A`") && message.contains("`B`") && message.contains("`C`"));
        assert!(!message.contains("`D`"), "{message}");
    }
}

#[test]
fn module_importing_itself() {
    let mut p = Project::new();
    let (m, _) = p.ttcn("M");
    p.import(m, "M");
    let mut graph = p.finish();

    let result = check_with(&mut graph, &no_import_reports());
    assert_eq!(codes(&result), vec![ErrorCode::E2006]);
}

/// `type T999 T998; ... type T1 T0; type integer T0;`, declared deepest
/// first so checking the first declaration descends through all of them.
fn alias_tower(depth: usize) -> ttcn_sema::ModuleGraph {
    let mut p = Project::new();
    let (_, root) = p.ttcn("M");
    for level in (1..depth).rev() {
        let below = format!("T{}", level - 1);
        let ty = p.type_ref(root, &below);
        p.type_def(root, &format!("T{level}"), ty);
    }
    let int = p.ty(root, TypeKind::Integer);
    p.type_def(root, "T0", int);

    let top = p.type_ref(root, &format!("T{}", depth - 1));
    let value = p.value(root, ValueKind::Integer(42));
    p.define_value(
        root,
        ttcn_sema::AssignmentKind::Const,
        "c_top",
        top,
        Some(value),
    );
    p.finish()
}

#[test]
fn thousand_aliases_within_default_budget() {
    let mut graph = alias_tower(1000);
    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn exhausted_budget_is_reported_not_fatal() {
    let mut graph = alias_tower(1000);
    let config = CheckConfig {
        recursion_limit: 50,
        ..CheckConfig::quiet()
    };
    let result = check_with(&mut graph, &config);
    assert!(result.count(ErrorCode::E9002) >= 1);
}
