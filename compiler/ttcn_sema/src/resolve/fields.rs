//! Walking field and index sub-references through a type.

use ttcn_ir::{ScopeId, TypeId};

use crate::check::Checker;
use crate::error::SemaError;
use crate::graph::{SubReference, TypeKind, ValueKind};

/// Where a sub-reference path ends.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PathEnd {
    pub ty: TypeId,
    /// The last step selected an optional field, so `omit` fits.
    pub optional: bool,
}

impl Checker<'_> {
    /// Follow `path` from `start`, one field or index at a time.
    ///
    /// Returns `None` when a step is invalid (reported) or a type on the way
    /// cannot be determined (already reported elsewhere).
    pub(crate) fn walk_subreferences(
        &mut self,
        start: TypeId,
        path: &[SubReference],
        scope: ScopeId,
    ) -> Option<PathEnd> {
        let mut end = PathEnd {
            ty: start,
            optional: false,
        };
        for subref in path {
            let last = self.last_type(end.ty)?;
            let data = self.graph.ty(last);
            let type_name = self.graph.type_name(last);
            match subref {
                SubReference::Field { name, location } => {
                    let Some(fields) = data.kind.fields() else {
                        let field = self.graph.display_in(data.module, *name);
                        self.report(SemaError::NonexistentField {
                            location: *location,
                            message: format!(
                                "invalid field reference `{field}`: type `{type_name}` has no fields"
                            ),
                        });
                        return None;
                    };
                    let found = fields.iter().find(|f| f.name == *name).copied();
                    let Some(field) = found else {
                        let module = self.graph.scope(scope).module;
                        let field = self.graph.display_in(module, *name);
                        self.report(SemaError::NonexistentField {
                            location: *location,
                            message: format!(
                                "reference to non-existent field `{field}` in type `{type_name}`"
                            ),
                        });
                        return None;
                    };
                    end = PathEnd {
                        ty: field.ty,
                        optional: field.optional,
                    };
                }
                SubReference::Array { index, location } => {
                    let (index, location) = (*index, *location);
                    let kind = data.kind.clone();
                    self.check_value(index, None, false);
                    let literal = match self.graph.value(index).kind {
                        ValueKind::Integer(i) => Some(i),
                        _ => None,
                    };
                    let next = match kind {
                        TypeKind::Array {
                            element,
                            length,
                            offset,
                        } => {
                            if let Some(i) = literal {
                                let upper = offset.saturating_add(i64::from(length));
                                if i < offset || i >= upper {
                                    self.report(SemaError::NonexistentField {
                                        location,
                                        message: format!(
                                            "index {i} is out of bounds: `{type_name}` allows {offset}..{}",
                                            upper - 1
                                        ),
                                    });
                                    return None;
                                }
                            }
                            element
                        }
                        TypeKind::RecordOf(element) | TypeKind::SetOf(element) => {
                            if let Some(i) = literal.filter(|i| *i < 0) {
                                self.report(SemaError::NonexistentField {
                                    location,
                                    message: format!("index {i} is negative"),
                                });
                                return None;
                            }
                            element
                        }
                        TypeKind::Bitstring
                        | TypeKind::Hexstring
                        | TypeKind::Octetstring => last,
                        ref k if k.is_character_string() => last,
                        _ => {
                            self.report(SemaError::NonexistentField {
                                location,
                                message: format!("type `{type_name}` cannot be indexed"),
                            });
                            return None;
                        }
                    };
                    end = PathEnd {
                        ty: next,
                        optional: false,
                    };
                }
                SubReference::Parameterized { location, .. } => {
                    self.report(SemaError::NonexistentField {
                        location: *location,
                        message: format!(
                            "a field of type `{type_name}` cannot take actual parameters"
                        ),
                    });
                    return None;
                }
            }
        }
        Some(end)
    }
}
