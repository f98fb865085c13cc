//! Checking values against their expected types.

use rustc_hash::FxHashSet;
use ttcn_ir::{ReferenceId, TypeId, ValueId};

use super::Checker;
use crate::error::SemaError;
use crate::graph::{BinaryOp, NamedValue, SubReference, TypeKind, UnaryOp, ValueKind};
use crate::scope::Lookup;

/// Value class of literals, operands and simple types.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Basic {
    Integer,
    Real,
    Boolean,
    /// Any character string kind.
    Charstring,
    Bitstring,
    Hexstring,
    Octetstring,
    Verdict,
}

impl Basic {
    pub(super) fn of_kind(kind: &TypeKind) -> Option<Basic> {
        Some(match kind {
            TypeKind::Integer => Basic::Integer,
            TypeKind::Real => Basic::Real,
            TypeKind::Boolean => Basic::Boolean,
            TypeKind::Bitstring => Basic::Bitstring,
            TypeKind::Hexstring => Basic::Hexstring,
            TypeKind::Octetstring | TypeKind::Any => Basic::Octetstring,
            TypeKind::Verdict => Basic::Verdict,
            k if k.is_character_string() => Basic::Charstring,
            _ => return None,
        })
    }

    fn name(self) -> &'static str {
        match self {
            Basic::Integer => "integer",
            Basic::Real => "float",
            Basic::Boolean => "boolean",
            Basic::Charstring => "character string",
            Basic::Bitstring => "bitstring",
            Basic::Hexstring => "hexstring",
            Basic::Octetstring => "octetstring",
            Basic::Verdict => "verdict",
        }
    }

    fn is_numeric(self) -> bool {
        matches!(self, Basic::Integer | Basic::Real)
    }

    fn is_string(self) -> bool {
        matches!(
            self,
            Basic::Charstring | Basic::Bitstring | Basic::Hexstring | Basic::Octetstring
        )
    }
}

impl Checker<'_> {
    /// Check `value` against `expected`.
    ///
    /// `optional` marks the slot of an optional field, the only place
    /// `omit` fits. With no expected type only the references inside the
    /// value are resolved and operators typed.
    pub fn check_value(&mut self, value: ValueId, expected: Option<TypeId>, optional: bool) {
        if self.graph.value(value).erroneous {
            return;
        }
        let kind = self.graph.value(value).kind.clone();
        let target = expected.and_then(|t| self.last_type(t));

        match kind {
            ValueKind::Omit => {
                if !optional {
                    self.value_mismatch(value, "`omit` is not allowed here".to_owned());
                }
            }
            ValueKind::Null => {
                if let Some(t) = target {
                    let fits = matches!(
                        self.graph.ty(t).kind,
                        TypeKind::Null | TypeKind::Default | TypeKind::Component { .. }
                    );
                    if !fits {
                        self.expected_other(value, t, "null value");
                    }
                }
            }
            ValueKind::Sequence(items) => self.check_sequence_value(value, &items, target),
            ValueKind::SequenceOf(items) => {
                self.check_list_value(value, &items, expected, target);
            }
            ValueKind::Reference(reference) => {
                self.check_reference_value(value, reference, expected, target);
            }
            _ => {
                let Some(found) = self.infer_basic(value) else {
                    return;
                };
                let (Some(expected), Some(t)) = (expected, target) else {
                    return;
                };
                if Basic::of_kind(&self.graph.ty(t).kind) != Some(found) {
                    self.expected_other(value, t, found.name());
                    return;
                }
                self.check_literal_subtype(value, expected);
            }
        }
    }

    fn value_mismatch(&mut self, value: ValueId, message: String) {
        let location = self.graph.value(value).location;
        self.report(SemaError::ValueMismatch { location, message });
        self.graph.value_mut(value).erroneous = true;
    }

    fn expected_other(&mut self, value: ValueId, ty: TypeId, found: &str) {
        let expected = self.graph.type_name(ty);
        self.value_mismatch(
            value,
            format!("a value of type `{expected}` was expected, found {found} value"),
        );
    }

    fn check_literal_subtype(&mut self, value: ValueId, expected: TypeId) {
        let Some(subtype) = self.effective_subtype(expected) else {
            return;
        };
        let kind = self.graph.value(value).kind.clone();
        let length = match &kind {
            ValueKind::Integer(i) => {
                if !subtype.admits_integer(*i) {
                    let name = self.graph.type_name(expected);
                    self.value_mismatch(
                        value,
                        format!("{i} is not a valid value for type `{name}` restricted to {subtype}"),
                    );
                }
                return;
            }
            ValueKind::Charstring(s) | ValueKind::Bitstring(s) | ValueKind::Hexstring(s) => {
                s.chars().count()
            }
            ValueKind::Octetstring(s) => s.len() / 2,
            _ => return,
        };
        let length = u64::try_from(length).unwrap_or(u64::MAX);
        if !subtype.admits_length(length) {
            let name = self.graph.type_name(expected);
            self.value_mismatch(
                value,
                format!("a value of length {length} does not fit type `{name}` restricted to {subtype}"),
            );
        }
    }

    /// A single unqualified name with no definition in sight; as a value of
    /// an enumerated type it names an item.
    pub(crate) fn is_bare_unresolvable(&self, reference: ReferenceId) -> Option<ttcn_ir::Identifier> {
        let data = self.graph.reference(reference);
        if data.module.is_some() || data.subrefs.len() != 1 {
            return None;
        }
        let SubReference::Field { name, .. } = data.subrefs[0] else {
            return None;
        };
        match self.graph.resolve_in_scope(data.scope, name) {
            Lookup::NotFound => Some(name),
            _ => None,
        }
    }

    fn check_reference_value(
        &mut self,
        value: ValueId,
        reference: ReferenceId,
        expected: Option<TypeId>,
        target: Option<TypeId>,
    ) {
        if let (Some(name), Some(t)) = (self.is_bare_unresolvable(reference), target) {
            if let TypeKind::Enumerated(items) = &self.graph.ty(t).kind {
                if items.iter().any(|item| item.name == name) {
                    return;
                }
                let type_name = self.graph.type_name(t);
                let item = self.graph.display_in(self.graph.value(value).module, name);
                self.value_mismatch(
                    value,
                    format!("`{item}` is not an item of the enumerated type `{type_name}`"),
                );
                return;
            }
        }

        if !self.check_value_reference_kind(value, reference) {
            return;
        }
        let (Some(expected), Some(end)) = (expected, self.reference_type(reference)) else {
            return;
        };
        let location = self.graph.value(value).location;
        self.check_compatibility(expected, end.ty, location);
    }

    /// The reference resolves to something that has a value.
    fn check_value_reference_kind(&mut self, value: ValueId, reference: ReferenceId) -> bool {
        let Some(target) = self.resolve(reference) else {
            self.graph.value_mut(value).erroneous = true;
            return false;
        };
        let kind = self.graph.assignment(target).kind;
        if kind.is_value_like() {
            return !self.graph.assignment(target).erroneous;
        }
        self.report(SemaError::WrongKind {
            location: self.graph.reference(reference).location,
            name: self.graph.reference_text(reference),
            expected: "value or template",
            found: kind.description(),
        });
        self.graph.value_mut(value).erroneous = true;
        false
    }

    fn check_sequence_value(&mut self, value: ValueId, items: &[NamedValue], target: Option<TypeId>) {
        let Some(t) = target else {
            for item in items {
                self.check_value(item.value, None, false);
            }
            return;
        };
        let type_name = self.graph.type_name(t);
        match self.graph.ty(t).kind.clone() {
            TypeKind::Record(fields) | TypeKind::Set(fields) => {
                let mut seen = FxHashSet::default();
                for item in items {
                    let field_name = self.graph.display_in(self.graph.value(value).module, item.name);
                    if !seen.insert(item.name) {
                        self.report(SemaError::ValueMismatch {
                            location: item.location,
                            message: format!("duplicate field `{field_name}` in the value"),
                        });
                        continue;
                    }
                    match fields.iter().find(|f| f.name == item.name) {
                        Some(field) => self.check_value(item.value, Some(field.ty), field.optional),
                        None => self.report(SemaError::NonexistentField {
                            location: item.location,
                            message: format!(
                                "reference to non-existent field `{field_name}` in a value of type `{type_name}`"
                            ),
                        }),
                    }
                }
                for field in fields.iter().filter(|f| !f.optional && !seen.contains(&f.name)) {
                    let field_name = self.graph.display_in(self.graph.ty(t).module, field.name);
                    self.value_mismatch(
                        value,
                        format!("field `{field_name}` is missing from the value of type `{type_name}`"),
                    );
                }
            }
            TypeKind::Union(alternatives) => {
                let [item] = items else {
                    self.value_mismatch(
                        value,
                        format!("a value of union type `{type_name}` selects exactly one alternative"),
                    );
                    return;
                };
                match alternatives.iter().find(|a| a.name == item.name) {
                    Some(alternative) => self.check_value(item.value, Some(alternative.ty), false),
                    None => {
                        let name = self.graph.display_in(self.graph.value(value).module, item.name);
                        self.report(SemaError::NonexistentField {
                            location: item.location,
                            message: format!(
                                "reference to non-existent alternative `{name}` of union type `{type_name}`"
                            ),
                        });
                    }
                }
            }
            TypeKind::RecordOf(_) | TypeKind::SetOf(_) | TypeKind::Array { .. } if items.is_empty() => {
                self.check_list_value(value, &[], Some(t), target);
            }
            _ => self.expected_other(value, t, "record or set"),
        }
    }

    fn check_list_value(
        &mut self,
        value: ValueId,
        items: &[ValueId],
        expected: Option<TypeId>,
        target: Option<TypeId>,
    ) {
        let Some(t) = target else {
            for &item in items {
                self.check_value(item, None, false);
            }
            return;
        };
        let type_name = self.graph.type_name(t);
        match self.graph.ty(t).kind.clone() {
            TypeKind::RecordOf(element) | TypeKind::SetOf(element) => {
                for &item in items {
                    self.check_value(item, Some(element), false);
                }
                let subtype = expected.and_then(|e| self.effective_subtype(e));
                let count = u64::try_from(items.len()).unwrap_or(u64::MAX);
                if let Some(subtype) = subtype.filter(|s| !s.admits_length(count)) {
                    self.value_mismatch(
                        value,
                        format!("{count} elements do not fit type `{type_name}` restricted to {subtype}"),
                    );
                }
            }
            TypeKind::Array { element, length, .. } => {
                if usize::try_from(length).map_or(true, |l| l != items.len()) {
                    self.value_mismatch(
                        value,
                        format!(
                            "the array type `{type_name}` has {length} elements, the value has {}",
                            items.len()
                        ),
                    );
                }
                for &item in items {
                    self.check_value(item, Some(element), false);
                }
            }
            TypeKind::Record(fields) => {
                if items.len() > fields.len() {
                    self.value_mismatch(
                        value,
                        format!(
                            "too many elements for record type `{type_name}`: {} fields, {} elements",
                            fields.len(),
                            items.len()
                        ),
                    );
                    return;
                }
                for (&item, field) in items.iter().zip(&fields) {
                    self.check_value(item, Some(field.ty), field.optional);
                }
                for field in fields[items.len()..].iter().filter(|f| !f.optional) {
                    let field_name = self.graph.display_in(self.graph.ty(t).module, field.name);
                    self.value_mismatch(
                        value,
                        format!("field `{field_name}` is missing from the value of type `{type_name}`"),
                    );
                }
            }
            _ => self.expected_other(value, t, "list"),
        }
    }

    /// Value class of a literal, reference or expression, typing operators
    /// on the way.
    pub(crate) fn infer_basic(&mut self, value: ValueId) -> Option<Basic> {
        if self.graph.value(value).erroneous {
            return None;
        }
        let kind = self.graph.value(value).kind.clone();
        match kind {
            ValueKind::Integer(_) => Some(Basic::Integer),
            ValueKind::Real(_) => Some(Basic::Real),
            ValueKind::Boolean(_) => Some(Basic::Boolean),
            ValueKind::Charstring(_) => Some(Basic::Charstring),
            ValueKind::Bitstring(_) => Some(Basic::Bitstring),
            ValueKind::Hexstring(_) => Some(Basic::Hexstring),
            ValueKind::Octetstring(_) => Some(Basic::Octetstring),
            ValueKind::Verdict(_) => Some(Basic::Verdict),
            ValueKind::Reference(reference) => {
                if self.is_bare_unresolvable(reference).is_some() {
                    // Possibly an enumeration item; nothing to compute with.
                    return None;
                }
                if !self.check_value_reference_kind(value, reference) {
                    return None;
                }
                let end = self.reference_type(reference)?;
                let last = self.last_type(end.ty)?;
                Basic::of_kind(&self.graph.ty(last).kind)
            }
            ValueKind::Unary(op, operand) => {
                let found = self.infer_basic(operand);
                match (op, found) {
                    (_, None) => None,
                    (UnaryOp::Not, Some(Basic::Boolean)) => Some(Basic::Boolean),
                    (UnaryOp::Neg, Some(b)) if b.is_numeric() => Some(b),
                    (UnaryOp::Not, Some(b)) => {
                        self.value_mismatch(
                            value,
                            format!("the operand of `not` must be a boolean value, found {} value", b.name()),
                        );
                        None
                    }
                    (UnaryOp::Neg, Some(b)) => {
                        self.value_mismatch(
                            value,
                            format!("the operand of `-` must be a numeric value, found {} value", b.name()),
                        );
                        None
                    }
                }
            }
            ValueKind::Binary(op, left, right) => {
                let (a, b) = (self.infer_basic(left), self.infer_basic(right));
                let result = if op.is_comparison() || op.is_logical() {
                    Some(Basic::Boolean)
                } else {
                    None
                };
                let (Some(a), Some(b)) = (a, b) else {
                    return result;
                };
                let fits = if op.is_arithmetic() {
                    a == b && a.is_numeric()
                } else if op == BinaryOp::Concat {
                    a == b && a.is_string()
                } else if op.is_logical() {
                    a == Basic::Boolean && b == Basic::Boolean
                } else if matches!(op, BinaryOp::Eq | BinaryOp::Ne) {
                    a == b
                } else {
                    a == b && a.is_numeric()
                };
                if !fits {
                    self.value_mismatch(
                        value,
                        format!(
                            "operands of `{}` do not fit: {} value and {} value",
                            op.symbol(),
                            a.name(),
                            b.name()
                        ),
                    );
                    return None;
                }
                result.or(Some(a))
            }
            ValueKind::Omit
            | ValueKind::Null
            | ValueKind::Sequence(_)
            | ValueKind::SequenceOf(_) => {
                self.check_value(value, None, true);
                None
            }
        }
    }
}
