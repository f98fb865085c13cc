//! Type checking: references, field tables, subtypes and component
//! extension.

use rustc_hash::FxHashMap;
use ttcn_ir::{Identifier, Location, ReferenceId, TypeId};

use super::Checker;
use crate::error::SemaError;
use crate::graph::TypeKind;
use crate::subtype::Subtype;
use crate::symbols::AssignmentKind;

impl Checker<'_> {
    pub fn check_type(&mut self, ty: TypeId) {
        if self.timestamp.is_covered_by(self.graph.ty(ty).last_checked) {
            return;
        }
        self.graph.ty_mut(ty).last_checked = Some(self.timestamp);

        match self.graph.ty(ty).kind.clone() {
            TypeKind::Referenced(reference) => self.check_type_reference(ty, reference),
            TypeKind::Record(fields) | TypeKind::Set(fields) | TypeKind::Union(fields) => {
                self.check_unique_names(fields.iter().map(|f| (f.name, f.location)));
                for field in &fields {
                    self.check_type(field.ty);
                }
            }
            TypeKind::Enumerated(items) => {
                self.check_unique_names(items.iter().map(|i| (i.name, i.location)));
                let mut values: FxHashMap<i64, Location> = FxHashMap::default();
                for item in &items {
                    let Some(value) = item.value else { continue };
                    if let Some(&previous) = values.get(&value) {
                        self.report(SemaError::ValueMismatch {
                            location: item.location,
                            message: format!(
                                "value {value} is already assigned to the item at {previous}"
                            ),
                        });
                    } else {
                        values.insert(value, item.location);
                    }
                }
            }
            TypeKind::RecordOf(element) | TypeKind::SetOf(element) => self.check_type(element),
            TypeKind::Array { element, .. } => self.check_type(element),
            TypeKind::Component { extends, .. } => {
                for reference in extends {
                    self.check_component_parent(reference);
                }
            }
            _ => {}
        }

        self.check_subtype(ty);
    }

    fn check_type_reference(&mut self, ty: TypeId, reference: ReferenceId) {
        let Some(target) = self.resolve(reference) else {
            self.graph.ty_mut(ty).erroneous = true;
            return;
        };
        let data = self.graph.assignment(target);
        if data.kind != AssignmentKind::Type {
            let found = data.kind.description();
            self.report(SemaError::WrongKind {
                location: self.graph.reference(reference).location,
                name: self.graph.reference_text(reference),
                expected: "type",
                found,
            });
            self.graph.ty_mut(ty).erroneous = true;
            return;
        }
        if data.erroneous {
            self.graph.ty_mut(ty).erroneous = true;
        }
        if let Some(referenced) = self.referenced_type(reference) {
            self.check_type(referenced);
        }
    }

    /// Field and item names are unique within one type.
    fn check_unique_names(&mut self, names: impl Iterator<Item = (Identifier, Location)>) {
        let mut seen: FxHashMap<Identifier, Location> = FxHashMap::default();
        let mut repeats = Vec::new();
        for (name, location) in names {
            match seen.get(&name) {
                Some(&first) => repeats.push((name, first, location)),
                None => {
                    seen.insert(name, location);
                }
            }
        }
        let idents = self.graph.identifiers().clone();
        for (name, first, repeated) in repeats {
            let name = idents.name(name).to_owned();
            self.report(SemaError::DuplicateDefinition {
                name: name.clone(),
                location: first,
                other: repeated,
                first: true,
            });
            self.report(SemaError::DuplicateDefinition {
                name,
                location: repeated,
                other: first,
                first: false,
            });
        }
    }

    fn check_component_parent(&mut self, reference: ReferenceId) {
        let location = self.graph.reference(reference).location;
        let Some(parent) = self.referenced_type(reference) else {
            return;
        };
        let Some(last) = self.last_type(parent) else {
            return;
        };
        if !matches!(self.graph.ty(last).kind, TypeKind::Component { .. }) {
            let found = self.graph.ty(last).kind.name(self.graph.ty(last).asn);
            self.report(SemaError::WrongKind {
                location,
                name: self.graph.reference_text(reference),
                expected: "component type",
                found,
            });
        }
    }

    /// A restriction must fit the kind it restricts and must not exclude
    /// everything the restricted parent type admits.
    fn check_subtype(&mut self, ty: TypeId) {
        let Some(subtype) = self.graph.ty(ty).subtype.clone() else {
            return;
        };
        let location = self.graph.ty(ty).location;

        if let Some(range) = subtype.range {
            if !range.is_valid() {
                self.report(SemaError::ValueMismatch {
                    location,
                    message: format!("the range restriction ({range}) is empty"),
                });
                self.graph.ty_mut(ty).erroneous = true;
                return;
            }
        }
        if let Some(length) = subtype.length {
            if !length.is_valid() {
                self.report(SemaError::ValueMismatch {
                    location,
                    message: format!("the restriction {length} is empty"),
                });
                self.graph.ty_mut(ty).erroneous = true;
                return;
            }
        }

        let Some(last) = self.last_type(ty) else {
            return;
        };
        let last_data = self.graph.ty(last);
        let kind_name = last_data.kind.name(last_data.asn);
        let numeric = matches!(last_data.kind, TypeKind::Integer | TypeKind::Real);
        let sized = matches!(
            last_data.kind,
            TypeKind::Bitstring
                | TypeKind::Hexstring
                | TypeKind::Octetstring
                | TypeKind::RecordOf(_)
                | TypeKind::SetOf(_)
        ) || last_data.kind.is_character_string();
        let misplaced = if subtype.range.is_some() && !numeric {
            Some("range")
        } else if subtype.length.is_some() && !sized {
            Some("length")
        } else if subtype.pattern.is_some() && !last_data.kind.is_character_string() {
            Some("pattern")
        } else {
            None
        };
        if let Some(aspect) = misplaced {
            self.report(SemaError::ValueMismatch {
                location,
                message: format!("a {aspect} restriction is not allowed for type `{kind_name}`"),
            });
            self.graph.ty_mut(ty).erroneous = true;
            return;
        }

        // `type Parent Child (restriction)`: the restriction must meet the
        // parent's one somewhere.
        if let TypeKind::Referenced(reference) = self.graph.ty(ty).kind {
            let inherited = self
                .referenced_type(reference)
                .and_then(|parent| self.effective_subtype(parent));
            if let Some(inherited) = inherited {
                if let Err(detail) = inherited.check_compatible(&subtype) {
                    let expected = self.graph.reference_text(reference);
                    let found = self.graph.type_name(ty);
                    self.report(SemaError::IncompatibleSubtype {
                        location,
                        expected,
                        found,
                        detail,
                    });
                }
            }
        }
    }

    /// Restriction in force for `ty`: its own narrowed by every one along
    /// the alias chain.
    pub fn effective_subtype(&mut self, ty: TypeId) -> Option<Subtype> {
        let mut current = ty;
        let mut result: Option<Subtype> = None;
        let mut seen = rustc_hash::FxHashSet::default();
        loop {
            if !seen.insert(current) {
                return result;
            }
            let data = self.graph.ty(current);
            if let Some(own) = &data.subtype {
                result = Some(match result {
                    Some(outer) => outer.narrow(own),
                    None => own.clone(),
                });
            }
            let TypeKind::Referenced(reference) = data.kind else {
                return result;
            };
            match self.referenced_type(reference) {
                Some(next) => current = next,
                None => return result,
            }
        }
    }
}
