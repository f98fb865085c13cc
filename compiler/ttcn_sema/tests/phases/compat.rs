//! Type compatibility as seen from declarations and values.

use pretty_assertions::assert_eq;
use ttcn_diagnostic::{DiagnosticSink, ErrorCode};
use ttcn_ir::{ScopeId, Timestamp, TypeId, ValueId};
use ttcn_sema::{
    AssignmentKind, CheckConfig, Checker, CompatibilityLevel, CompatibilityMode, EnumItem, Field,
    NamedValue, Subtype, TypeKind, ValueKind,
};

use crate::common::{check_with, codes, Project};

fn field(p: &mut Project, scope: ScopeId, name: &str, ty: TypeId) -> Field {
    let module = p.module_of(scope);
    let at = p.at();
    p.b.field(module, name, ty, at)
}

fn optional(p: &mut Project, scope: ScopeId, name: &str, ty: TypeId) -> Field {
    let module = p.module_of(scope);
    let at = p.at();
    p.b.optional_field(module, name, ty, at)
}

/// `{ name := value, ... }`
fn record_value(p: &mut Project, scope: ScopeId, items: &[(&str, ValueId)]) -> ValueId {
    let module = p.module_of(scope);
    let items = items
        .iter()
        .map(|&(name, value)| {
            let location = p.at();
            NamedValue {
                name: p.b.intern(module, name),
                value,
                location,
            }
        })
        .collect();
    p.value(scope, ValueKind::Sequence(items))
}

/// `type record <name> { integer <int_name>, <second> <second_name> }`
fn two_field_record(
    p: &mut Project,
    scope: ScopeId,
    name: &str,
    int_name: &str,
    second_name: &str,
    second: TypeKind,
) -> TypeId {
    let int = p.ty(scope, TypeKind::Integer);
    let other = p.ty(scope, second);
    let fields = vec![
        field(p, scope, int_name, int),
        field(p, scope, second_name, other),
    ];
    let record = p.ty(scope, TypeKind::Record(fields));
    p.type_def(scope, name, record);
    record
}

/// `A { x, y }`, `B { p, q }` of the same shape and `C { x, y }` whose
/// second field is a charstring; `c_a` is an `A` value.
fn records() -> (Project, ScopeId) {
    let mut p = Project::new();
    let (_, root) = p.ttcn("M");
    two_field_record(&mut p, root, "A", "x", "y", TypeKind::Boolean);
    two_field_record(&mut p, root, "B", "p", "q", TypeKind::Boolean);
    two_field_record(&mut p, root, "C", "x", "y", TypeKind::Charstring);

    let one = p.value(root, ValueKind::Integer(1));
    let yes = p.value(root, ValueKind::Boolean(true));
    let value = record_value(&mut p, root, &[("x", one), ("y", yes)]);
    let a = p.type_ref(root, "A");
    p.define_value(root, AssignmentKind::Const, "c_a", a, Some(value));
    (p, root)
}

#[test]
fn same_shape_is_enough_by_default() {
    let (mut p, root) = records();
    let b = p.type_ref(root, "B");
    let from_a = p.value_ref(root, "c_a");
    p.define_value(root, AssignmentKind::Const, "c_b", b, Some(from_a));
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let nominal = CheckConfig {
        compatibility: CompatibilityMode::Nominal,
        ..CheckConfig::quiet()
    };
    let result = ttcn_sema::check_modules(&mut graph, &nominal, Timestamp::new(2));
    assert_eq!(codes(&result), vec![ErrorCode::E2001]);
}

#[test]
fn mismatch_names_the_offending_fields() {
    let (mut p, root) = records();
    let c = p.type_ref(root, "C");
    let from_a = p.value_ref(root, "c_a");
    p.define_value(root, AssignmentKind::Const, "c_c", c, Some(from_a));
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert_eq!(codes(&result), vec![ErrorCode::E2001]);
    let diag = &result.diagnostics[0];
    assert!(diag.message.contains("`C`") && diag.message.contains("`A`"), "{}", diag.message);
    assert!(diag.notes.iter().any(|n| n.contains("`y` vs `y`")), "{:?}", diag.notes);
}

#[test]
fn record_values_are_checked_field_by_field() {
    let mut p = Project::new();
    let (_, root) = p.ttcn("M");
    let int = p.ty(root, TypeKind::Integer);
    let text = p.ty(root, TypeKind::Charstring);
    let fields = vec![field(&mut p, root, "id", int), optional(&mut p, root, "note", text)];
    let record = p.ty(root, TypeKind::Record(fields));
    p.type_def(root, "Msg", record);

    // { id := 1, note := omit } fits.
    let one = p.value(root, ValueKind::Integer(1));
    let omit = p.value(root, ValueKind::Omit);
    let fits = record_value(&mut p, root, &[("id", one), ("note", omit)]);
    let ty = p.type_ref(root, "Msg");
    p.define_value(root, AssignmentKind::Const, "c_fits", ty, Some(fits));

    // { note := "x" } lacks `id`.
    let text = p.value(root, ValueKind::Charstring("x".into()));
    let missing = record_value(&mut p, root, &[("note", text)]);
    let ty = p.type_ref(root, "Msg");
    p.define_value(root, AssignmentKind::Const, "c_missing", ty, Some(missing));

    // { id := 2, extra := 3 } names a field `Msg` does not have.
    let two = p.value(root, ValueKind::Integer(2));
    let three = p.value(root, ValueKind::Integer(3));
    let extra = record_value(&mut p, root, &[("id", two), ("extra", three)]);
    let ty = p.type_ref(root, "Msg");
    p.define_value(root, AssignmentKind::Const, "c_extra", ty, Some(extra));

    // { id := omit } puts `omit` into a mandatory field.
    let omit = p.value(root, ValueKind::Omit);
    let omitted = record_value(&mut p, root, &[("id", omit)]);
    let ty = p.type_ref(root, "Msg");
    p.define_value(root, AssignmentKind::Const, "c_omitted", ty, Some(omitted));
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert_eq!(
        codes(&result),
        vec![ErrorCode::E2010, ErrorCode::E2008, ErrorCode::E2010]
    );
}

#[test]
fn character_strings_widen_but_do_not_narrow() {
    let mut p = Project::new();
    let (_, root) = p.ttcn("M");
    let narrow = p.ty(root, TypeKind::Charstring);
    let text = p.value(root, ValueKind::Charstring("abc".into()));
    p.define_value(root, AssignmentKind::Const, "c_narrow", narrow, Some(text));

    let wide = p.ty(root, TypeKind::UniversalCharstring);
    let from_narrow = p.value_ref(root, "c_narrow");
    p.define_value(root, AssignmentKind::Const, "c_wide", wide, Some(from_narrow));

    let back = p.ty(root, TypeKind::Charstring);
    let from_wide = p.value_ref(root, "c_wide");
    p.define_value(root, AssignmentKind::Const, "c_back", back, Some(from_wide));
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert_eq!(codes(&result), vec![ErrorCode::E2001]);
}

#[test]
fn restrictions_must_overlap() {
    let mut p = Project::new();
    let (_, root) = p.ttcn("M");
    let small = p.ty(root, TypeKind::Integer);
    p.b.set_subtype(small, Subtype::range(Some(0), Some(10)));
    p.type_def(root, "Small", small);
    let big = p.ty(root, TypeKind::Integer);
    p.b.set_subtype(big, Subtype::range(Some(20), Some(30)));
    p.type_def(root, "Big", big);

    let five = p.value(root, ValueKind::Integer(5));
    let ty = p.type_ref(root, "Small");
    p.define_value(root, AssignmentKind::Const, "c_small", ty, Some(five));

    let ty = p.type_ref(root, "Big");
    let from_small = p.value_ref(root, "c_small");
    p.define_value(root, AssignmentKind::Const, "c_big", ty, Some(from_small));

    let eleven = p.value(root, ValueKind::Integer(11));
    let ty = p.type_ref(root, "Small");
    p.define_value(root, AssignmentKind::Const, "c_too_big", ty, Some(eleven));
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert_eq!(codes(&result), vec![ErrorCode::E2002, ErrorCode::E2010]);
}

#[test]
fn enumeration_items_are_values_of_their_type() {
    let mut p = Project::new();
    let (m, root) = p.ttcn("M");
    let items: Vec<EnumItem> = ["red", "green"]
        .into_iter()
        .map(|name| {
            let at = p.at();
            p.b.enum_item(m, name, None, at)
        })
        .collect();
    let color = p.ty(root, TypeKind::Enumerated(items));
    p.type_def(root, "Color", color);

    let red = p.value_ref(root, "red");
    let ty = p.type_ref(root, "Color");
    p.define_value(root, AssignmentKind::Const, "c_red", ty, Some(red));

    let blue = p.value_ref(root, "blue");
    let ty = p.type_ref(root, "Color");
    p.define_value(root, AssignmentKind::Const, "c_blue", ty, Some(blue));

    // Outside an enumerated context an item name is just unknown.
    let stray = p.value_ref(root, "green");
    p.int_const(root, "c_green", stray);
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::quiet());
    assert_eq!(codes(&result), vec![ErrorCode::E2010, ErrorCode::E2003]);
}

#[test]
fn recursive_asn_sequences_are_compatible() {
    let mut p = Project::new();
    let (_, root) = p.asn("Rec-Types");

    // Node ::= SEQUENCE { payload INTEGER, link Alias OPTIONAL }
    let int = p.ty(root, TypeKind::Integer);
    let link = p.type_ref(root, "Alias");
    let fields = vec![
        field(&mut p, root, "payload", int),
        optional(&mut p, root, "link", link),
    ];
    let node = p.ty(root, TypeKind::Record(fields));
    p.type_def(root, "Node", node);

    // Alias ::= Node
    let alias = p.type_ref(root, "Node");
    p.type_def(root, "Alias", alias);

    // Other ::= SEQUENCE { payload INTEGER, link Other OPTIONAL }
    let int = p.ty(root, TypeKind::Integer);
    let link = p.type_ref(root, "Other");
    let fields = vec![
        field(&mut p, root, "payload", int),
        optional(&mut p, root, "link", link),
    ];
    let other = p.ty(root, TypeKind::Record(fields));
    p.type_def(root, "Other", other);
    let mut graph = p.finish();

    let result = check_with(&mut graph, &CheckConfig::default());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let config = CheckConfig::quiet();
    let mut sink = DiagnosticSink::new();
    let mut checker = Checker::new(&mut graph, &config, &mut sink, Timestamp::new(1));
    let (level, info) = checker.compatibility(node, other);
    assert_eq!(level, CompatibilityLevel::Compatible);
    assert!(info.has_recursion);
    let (level, _) = checker.compatibility(alias, node);
    assert_eq!(level, CompatibilityLevel::Compatible);
    assert!(sink.is_empty());
}

#[test]
fn sequence_behind_a_thousand_aliases_under_default_budget() {
    let mut p = Project::new();
    let (_, root) = p.asn("Deep-Types");

    // Node ::= SEQUENCE { payload INTEGER, link A999 OPTIONAL }
    let int = p.ty(root, TypeKind::Integer);
    let link = p.type_ref(root, "A999");
    let fields = vec![
        field(&mut p, root, "payload", int),
        optional(&mut p, root, "link", link),
    ];
    let node = p.ty(root, TypeKind::Record(fields));
    p.type_def(root, "Node", node);

    // A999 ::= A998 ... A1 ::= A0, A0 ::= Node
    for level in (1..1000).rev() {
        let below = p.type_ref(root, &format!("A{}", level - 1));
        p.type_def(root, &format!("A{level}"), below);
    }
    let bottom = p.type_ref(root, "Node");
    p.type_def(root, "A0", bottom);

    // Other ::= SEQUENCE { payload INTEGER, link Other OPTIONAL }
    let int = p.ty(root, TypeKind::Integer);
    let link = p.type_ref(root, "Other");
    let fields = vec![
        field(&mut p, root, "payload", int),
        optional(&mut p, root, "link", link),
    ];
    let other = p.ty(root, TypeKind::Record(fields));
    p.type_def(root, "Other", other);
    let mut graph = p.finish();

    let mut fresh = graph.clone();
    let result = check_with(&mut fresh, &CheckConfig::default());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let config = CheckConfig::default();
    let mut sink = DiagnosticSink::new();
    let mut checker = Checker::new(&mut graph, &config, &mut sink, Timestamp::new(1));
    let (level, info) = checker.compatibility(node, other);
    assert_eq!(level, CompatibilityLevel::Compatible);
    assert!(info.has_recursion);
    assert!(sink.is_empty());
}
