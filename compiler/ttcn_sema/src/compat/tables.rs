//! Compatibility of the unstructured kinds.

use crate::graph::{AsnStringKind, TypeKind};

/// Character string families, from the widest repertoire down.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
enum StringTier {
    /// Any character, any subset.
    Universal,
    /// ISO 2022 graphic repertoires.
    Graphic,
    /// Subsets of the 7-bit repertoire.
    Narrow,
}

fn string_tier(kind: &TypeKind) -> Option<StringTier> {
    Some(match kind {
        TypeKind::UniversalCharstring => StringTier::Universal,
        TypeKind::Charstring => StringTier::Narrow,
        TypeKind::AsnString(kind) => match kind {
            AsnStringKind::Utf8 | AsnStringKind::Bmp | AsnStringKind::Universal => {
                StringTier::Universal
            }
            AsnStringKind::Teletex
            | AsnStringKind::Videotex
            | AsnStringKind::Graphic
            | AsnStringKind::General
            | AsnStringKind::ObjectDescriptor => StringTier::Graphic,
            AsnStringKind::Numeric
            | AsnStringKind::Printable
            | AsnStringKind::Ia5
            | AsnStringKind::Visible => StringTier::Narrow,
        },
        _ => return None,
    })
}

/// Whether a value of kind `right` fits where kind `left` is expected.
///
/// `None` when the pair is not decided by kind alone (structured types,
/// components and types compatible only with themselves).
pub(super) fn simple_compatible(left: &TypeKind, right: &TypeKind, left_asn: bool) -> Option<bool> {
    use TypeKind as K;

    if let (Some(l), Some(r)) = (string_tier(left), string_tier(right)) {
        // A wider repertoire accepts every narrower one.
        return Some(l <= r);
    }

    let fits = match (left, right) {
        (K::Integer, K::Integer)
        | (K::Real, K::Real)
        | (K::Boolean, K::Boolean)
        | (K::Verdict, K::Verdict)
        | (K::Bitstring, K::Bitstring)
        | (K::Hexstring, K::Hexstring)
        | (K::Octetstring, K::Octetstring)
        | (K::Null, K::Null)
        | (K::Default, K::Default)
        | (K::Any, K::Any)
        | (K::ObjectIdentifier, K::ObjectIdentifier)
        | (K::RelativeOid, K::RelativeOid) => true,
        // A TTCN-3 octetstring takes ASN.1 `ANY`; `ANY` takes nothing else.
        (K::Octetstring, K::Any) => !left_asn,
        (K::ObjectIdentifier, K::RelativeOid) => true,
        (
            K::Enumerated(_)
            | K::Port
            | K::Signature
            | K::Component { .. }
            | K::Function
            | K::Altstep
            | K::Testcase,
            _,
        ) => return None,
        _ if left.is_structured() || right.is_structured() => return None,
        _ => false,
    };
    Some(fits)
}
