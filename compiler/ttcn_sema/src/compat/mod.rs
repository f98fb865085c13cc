//! Type compatibility.
//!
//! `compatible(left, right)` asks whether a value of `right` may stand where
//! `left` is expected. Aliases are looked through first; identical types
//! always fit. Unstructured kinds are decided by table, structured kinds
//! field by field. Recursive types compare coinductively: a pair already
//! under comparison further up the two chains is assumed to fit.

mod tables;

use rustc_hash::FxHashSet;
use ttcn_ir::{Location, TypeId};

use crate::chain::{pair_registered, TypeChain};
use crate::check::Checker;
use crate::config::CompatibilityMode;
use crate::error::SemaError;
use crate::graph::{Field, TypeKind};

/// Outcome of a compatibility question.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CompatibilityLevel {
    IncompatibleType,
    /// The types fit but their restrictions share no value.
    IncompatibleSubtype,
    Compatible,
}

/// Details gathered while comparing two types.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TypeCompatibilityInfo {
    /// Innermost pair that did not fit.
    pub left: Option<TypeId>,
    pub right: Option<TypeId>,
    /// Path from the compared types down to that pair, e.g. `.a[]`.
    pub left_path: String,
    pub right_path: String,
    /// A record of and an array met; the value has to be converted.
    pub needs_conversion: bool,
    /// The comparison closed over a recursive type.
    pub has_recursion: bool,
    pub error: Option<String>,
    pub subtype_error: Option<String>,
}

impl TypeCompatibilityInfo {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, left: TypeId, right: TypeId, message: String) -> bool {
        if self.error.is_none() {
            self.left = Some(left);
            self.right = Some(right);
            self.error = Some(message);
        }
        false
    }

    /// `left_path` vs `right_path: reason`, for the diagnostic detail.
    pub fn describe(&self) -> Option<String> {
        let error = self.error.as_deref()?;
        if self.left_path.is_empty() && self.right_path.is_empty() {
            return Some(error.to_owned());
        }
        Some(format!(
            "`{}` vs `{}`: {error}",
            display_path(&self.left_path),
            display_path(&self.right_path)
        ))
    }
}

fn display_path(path: &str) -> &str {
    path.strip_prefix('.').unwrap_or(path)
}

impl Checker<'_> {
    /// Follow aliases to the type that defines the shape of `ty`.
    ///
    /// `None` when the chain breaks: an unresolved or erroneous reference,
    /// or an alias cycle. Callers treat that as "fits", the cause is
    /// reported where it occurs.
    pub fn last_type(&mut self, ty: TypeId) -> Option<TypeId> {
        let mut current = ty;
        let mut seen = FxHashSet::default();
        loop {
            if !seen.insert(current) {
                return None;
            }
            let data = self.graph.ty(current);
            if data.erroneous {
                return None;
            }
            let TypeKind::Referenced(reference) = data.kind else {
                return Some(current);
            };
            let target = self.resolve(reference)?;
            if self.graph.assignment(target).erroneous {
                return None;
            }
            current = self.referenced_type(reference)?;
        }
    }

    /// Whether a value of `right` fits where `left` is expected.
    pub fn compatible(
        &mut self,
        left: TypeId,
        right: TypeId,
        info: &mut TypeCompatibilityInfo,
        left_chain: &mut TypeChain,
        right_chain: &mut TypeChain,
    ) -> bool {
        let (Some(l), Some(r)) = (self.last_type(left), self.last_type(right)) else {
            return true;
        };
        if l == r {
            return true;
        }
        let left_kind = self.graph.ty(l).kind.clone();
        let right_kind = self.graph.ty(r).kind.clone();

        if let (TypeKind::Component { .. }, TypeKind::Component { .. }) = (&left_kind, &right_kind) {
            if self.component_extends(r, l) {
                return true;
            }
            let message = format!(
                "component type `{}` does not extend `{}`",
                self.graph.type_name(r),
                self.graph.type_name(l)
            );
            return info.fail(l, r, message);
        }

        if left_kind.is_structured() && right_kind.is_structured() {
            if self.config.compatibility == CompatibilityMode::Nominal {
                let message = "structured types fit only themselves".to_owned();
                return info.fail(l, r, message);
            }
            if pair_registered(left_chain, right_chain, l, r) {
                info.has_recursion = true;
                return true;
            }
            left_chain.mark_state();
            right_chain.mark_state();
            left_chain.add(l);
            right_chain.add(r);
            let fits = ttcn_stack::ensure_sufficient_stack(|| {
                self.structured_compatible(l, r, &left_kind, &right_kind, info, left_chain, right_chain)
            });
            left_chain.previous_state();
            right_chain.previous_state();
            return fits;
        }

        let left_asn = self.graph.ty(l).asn;
        if tables::simple_compatible(&left_kind, &right_kind, left_asn) == Some(true) {
            return true;
        }
        let message = format!(
            "`{}` is not compatible with `{}`",
            self.graph.type_name(r),
            self.graph.type_name(l)
        );
        info.fail(l, r, message)
    }

    #[allow(clippy::too_many_arguments)]
    fn structured_compatible(
        &mut self,
        l: TypeId,
        r: TypeId,
        left_kind: &TypeKind,
        right_kind: &TypeKind,
        info: &mut TypeCompatibilityInfo,
        left_chain: &mut TypeChain,
        right_chain: &mut TypeChain,
    ) -> bool {
        let mut chains = (left_chain, right_chain);
        match (left_kind, right_kind) {
            (TypeKind::Record(lf), TypeKind::Record(rf)) | (TypeKind::Set(lf), TypeKind::Set(rf)) => {
                self.fields_compatible(l, r, lf, rf, info, &mut chains)
            }
            (TypeKind::Union(la), TypeKind::Union(ra)) => {
                for right_alt in ra {
                    let Some(left_alt) = la.iter().find(|a| a.name == right_alt.name) else {
                        let name = self.graph.display_in(self.graph.ty(r).module, right_alt.name);
                        let message = format!("alternative `{name}` has no counterpart");
                        return info.fail(l, r, message);
                    };
                    let (ls, rs) = (self.field_segment(l, left_alt), self.field_segment(r, right_alt));
                    if !self.descend(left_alt.ty, right_alt.ty, &ls, &rs, info, &mut chains) {
                        return false;
                    }
                }
                true
            }
            (TypeKind::RecordOf(le), TypeKind::RecordOf(re)) | (TypeKind::SetOf(le), TypeKind::SetOf(re)) => {
                self.descend(*le, *re, "[]", "[]", info, &mut chains)
            }
            (TypeKind::RecordOf(le), TypeKind::Array { element: re, .. })
            | (TypeKind::Array { element: le, .. }, TypeKind::RecordOf(re)) => {
                info.needs_conversion = true;
                self.descend(*le, *re, "[]", "[]", info, &mut chains)
            }
            (
                TypeKind::Array {
                    element: le,
                    length: ll,
                    ..
                },
                TypeKind::Array {
                    element: re,
                    length: rl,
                    ..
                },
            ) => {
                if ll != rl {
                    return info.fail(l, r, format!("array lengths differ: {ll} and {rl}"));
                }
                self.descend(*le, *re, "[]", "[]", info, &mut chains)
            }
            _ => {
                let message = format!(
                    "a {} is not compatible with a {}",
                    right_kind.name(self.graph.ty(r).asn),
                    left_kind.name(self.graph.ty(l).asn)
                );
                info.fail(l, r, message)
            }
        }
    }

    /// Records and sets compare position by position.
    fn fields_compatible(
        &mut self,
        l: TypeId,
        r: TypeId,
        left_fields: &[Field],
        right_fields: &[Field],
        info: &mut TypeCompatibilityInfo,
        chains: &mut (&mut TypeChain, &mut TypeChain),
    ) -> bool {
        if left_fields.len() != right_fields.len() {
            let message = format!(
                "the number of fields differs: {} and {}",
                left_fields.len(),
                right_fields.len()
            );
            return info.fail(l, r, message);
        }
        for (lf, rf) in left_fields.iter().zip(right_fields) {
            let (ls, rs) = (self.field_segment(l, lf), self.field_segment(r, rf));
            if lf.optional != rf.optional {
                info.left_path.insert_str(0, &ls);
                info.right_path.insert_str(0, &rs);
                return info.fail(l, r, "optional and mandatory fields do not mix".to_owned());
            }
            if !self.descend(lf.ty, rf.ty, &ls, &rs, info, chains) {
                return false;
            }
        }
        true
    }

    fn field_segment(&self, owner: TypeId, field: &Field) -> String {
        format!(".{}", self.graph.display_in(self.graph.ty(owner).module, field.name))
    }

    /// Compare one pair of component types, recording the path on failure.
    fn descend(
        &mut self,
        left: TypeId,
        right: TypeId,
        left_segment: &str,
        right_segment: &str,
        info: &mut TypeCompatibilityInfo,
        chains: &mut (&mut TypeChain, &mut TypeChain),
    ) -> bool {
        let fits = self.compatible(left, right, info, chains.0, chains.1);
        if !fits {
            info.left_path.insert_str(0, left_segment);
            info.right_path.insert_str(0, right_segment);
        }
        fits
    }

    /// Whether component `child` is, or transitively extends, `ancestor`.
    fn component_extends(&mut self, child: TypeId, ancestor: TypeId) -> bool {
        let mut pending = vec![child];
        let mut seen = FxHashSet::default();
        while let Some(current) = pending.pop() {
            if current == ancestor {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            let TypeKind::Component { extends, .. } = self.graph.ty(current).kind.clone() else {
                continue;
            };
            for reference in extends {
                if let Some(parent) = self.referenced_type(reference).and_then(|p| self.last_type(p)) {
                    pending.push(parent);
                }
            }
        }
        false
    }

    /// Compatibility of `right` where `left` is expected, restrictions
    /// included.
    pub fn compatibility(
        &mut self,
        left: TypeId,
        right: TypeId,
    ) -> (CompatibilityLevel, TypeCompatibilityInfo) {
        let mut info = TypeCompatibilityInfo::new();
        let (mut left_chain, mut right_chain) = (TypeChain::new(), TypeChain::new());
        if !self.compatible(left, right, &mut info, &mut left_chain, &mut right_chain) {
            return (CompatibilityLevel::IncompatibleType, info);
        }
        let restrictions = (self.effective_subtype(left), self.effective_subtype(right));
        if let (Some(expected), Some(found)) = restrictions {
            if let Err(detail) = expected.check_compatible(&found) {
                info.subtype_error = Some(detail);
                return (CompatibilityLevel::IncompatibleSubtype, info);
            }
        }
        (CompatibilityLevel::Compatible, info)
    }

    /// Check and report: a value of `found` used where `expected` is
    /// required.
    pub(crate) fn check_compatibility(
        &mut self,
        expected: TypeId,
        found: TypeId,
        location: Location,
    ) -> CompatibilityLevel {
        let (level, info) = self.compatibility(expected, found);
        let (expected_name, found_name) = (self.graph.type_name(expected), self.graph.type_name(found));
        match level {
            CompatibilityLevel::IncompatibleType => {
                tracing::debug!(expected = %expected_name, found = %found_name, "incompatible types");
                let error = SemaError::IncompatibleType {
                    location,
                    expected: expected_name,
                    found: found_name,
                    detail: info.describe(),
                };
                let severity = self.config.compatibility_severity;
                self.report_with(error, severity);
            }
            CompatibilityLevel::IncompatibleSubtype => {
                self.report(SemaError::IncompatibleSubtype {
                    location,
                    expected: expected_name,
                    found: found_name,
                    detail: info.subtype_error.unwrap_or_default(),
                });
            }
            CompatibilityLevel::Compatible => {}
        }
        level
    }
}
