//! Type nodes.

use ttcn_ir::{AssignmentId, Identifier, Location, ModuleId, ReferenceId, ScopeId, Timestamp, TypeId};

use crate::subtype::Subtype;

/// ASN.1 restricted character string kinds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AsnStringKind {
    Utf8,
    Bmp,
    Universal,
    Numeric,
    Printable,
    Ia5,
    Visible,
    Teletex,
    Videotex,
    Graphic,
    General,
    ObjectDescriptor,
}

impl AsnStringKind {
    pub fn name(self) -> &'static str {
        match self {
            AsnStringKind::Utf8 => "UTF8String",
            AsnStringKind::Bmp => "BMPString",
            AsnStringKind::Universal => "UniversalString",
            AsnStringKind::Numeric => "NumericString",
            AsnStringKind::Printable => "PrintableString",
            AsnStringKind::Ia5 => "IA5String",
            AsnStringKind::Visible => "VisibleString",
            AsnStringKind::Teletex => "TeletexString",
            AsnStringKind::Videotex => "VideotexString",
            AsnStringKind::Graphic => "GraphicString",
            AsnStringKind::General => "GeneralString",
            AsnStringKind::ObjectDescriptor => "ObjectDescriptor",
        }
    }
}

/// Field of a record, set or union.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Field {
    pub name: Identifier,
    pub ty: TypeId,
    pub optional: bool,
    pub location: Location,
}

/// Item of an enumerated type.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct EnumItem {
    pub name: Identifier,
    pub value: Option<i64>,
    pub location: Location,
}

/// Shape of a type.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeKind {
    Boolean,
    Integer,
    Real,
    Verdict,
    Default,
    /// ASN.1 `NULL`.
    Null,
    /// ASN.1 `ANY`.
    Any,
    ObjectIdentifier,
    RelativeOid,
    Bitstring,
    Hexstring,
    Octetstring,
    Charstring,
    UniversalCharstring,
    AsnString(AsnStringKind),
    Enumerated(Vec<EnumItem>),
    Record(Vec<Field>),
    Set(Vec<Field>),
    Union(Vec<Field>),
    RecordOf(TypeId),
    SetOf(TypeId),
    Array {
        element: TypeId,
        length: u32,
        offset: i64,
    },
    Component {
        extends: Vec<ReferenceId>,
        body: Option<ScopeId>,
    },
    Port,
    Signature,
    Function,
    Altstep,
    Testcase,
    /// Alias of, or reference to, a named type.
    Referenced(ReferenceId),
}

impl TypeKind {
    /// Kind name in the given dialect.
    pub fn name(&self, asn: bool) -> &'static str {
        match (self, asn) {
            (TypeKind::Boolean, false) => "boolean",
            (TypeKind::Boolean, true) => "BOOLEAN",
            (TypeKind::Integer, false) => "integer",
            (TypeKind::Integer, true) => "INTEGER",
            (TypeKind::Real, false) => "float",
            (TypeKind::Real, true) => "REAL",
            (TypeKind::Verdict, _) => "verdicttype",
            (TypeKind::Default, _) => "default",
            (TypeKind::Null, _) => "NULL",
            (TypeKind::Any, _) => "ANY",
            (TypeKind::ObjectIdentifier, false) => "objid",
            (TypeKind::ObjectIdentifier, true) => "OBJECT IDENTIFIER",
            (TypeKind::RelativeOid, _) => "RELATIVE-OID",
            (TypeKind::Bitstring, false) => "bitstring",
            (TypeKind::Bitstring, true) => "BIT STRING",
            (TypeKind::Hexstring, _) => "hexstring",
            (TypeKind::Octetstring, false) => "octetstring",
            (TypeKind::Octetstring, true) => "OCTET STRING",
            (TypeKind::Charstring, _) => "charstring",
            (TypeKind::UniversalCharstring, _) => "universal charstring",
            (TypeKind::AsnString(kind), _) => kind.name(),
            (TypeKind::Enumerated(_), false) => "enumerated",
            (TypeKind::Enumerated(_), true) => "ENUMERATED",
            (TypeKind::Record(_), false) => "record",
            (TypeKind::Record(_), true) => "SEQUENCE",
            (TypeKind::Set(_), false) => "set",
            (TypeKind::Set(_), true) => "SET",
            (TypeKind::Union(_), false) => "union",
            (TypeKind::Union(_), true) => "CHOICE",
            (TypeKind::RecordOf(_), false) => "record of",
            (TypeKind::RecordOf(_), true) => "SEQUENCE OF",
            (TypeKind::SetOf(_), false) => "set of",
            (TypeKind::SetOf(_), true) => "SET OF",
            (TypeKind::Array { .. }, _) => "array",
            (TypeKind::Component { .. }, _) => "component",
            (TypeKind::Port, _) => "port",
            (TypeKind::Signature, _) => "signature",
            (TypeKind::Function, _) => "function",
            (TypeKind::Altstep, _) => "altstep",
            (TypeKind::Testcase, _) => "testcase",
            (TypeKind::Referenced(_), _) => "referenced type",
        }
    }

    /// Kinds compared field by field (or element by element).
    pub fn is_structured(&self) -> bool {
        matches!(
            self,
            TypeKind::Record(_)
                | TypeKind::Set(_)
                | TypeKind::Union(_)
                | TypeKind::RecordOf(_)
                | TypeKind::SetOf(_)
                | TypeKind::Array { .. }
        )
    }

    /// Fields of a record, set or union.
    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            TypeKind::Record(fields) | TypeKind::Set(fields) | TypeKind::Union(fields) => {
                Some(fields)
            }
            _ => None,
        }
    }

    /// Element type of a list or array.
    pub fn element(&self) -> Option<TypeId> {
        match self {
            TypeKind::RecordOf(element)
            | TypeKind::SetOf(element)
            | TypeKind::Array { element, .. } => Some(*element),
            _ => None,
        }
    }

    pub fn is_character_string(&self) -> bool {
        matches!(
            self,
            TypeKind::Charstring | TypeKind::UniversalCharstring | TypeKind::AsnString(_)
        )
    }
}

/// What gives a type its name.
///
/// The naming parent is a handle, so a type never owns (or weakly points
/// to) the node that names it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeOwner {
    /// Type of a named declaration.
    Assignment(AssignmentId),
    /// Type of a record/set/union field.
    Field { parent: TypeId, name: Identifier },
    /// Element type of a list or array.
    Element(TypeId),
    /// Inline type without a name (e.g. the type of a local variable).
    Anonymous(ModuleId),
}

#[derive(Clone, Debug)]
pub struct TypeData {
    pub kind: TypeKind,
    pub location: Location,
    pub owner: TypeOwner,
    pub module: ModuleId,
    /// Declared in an ASN.1 module.
    pub asn: bool,
    pub subtype: Option<Subtype>,
    pub(crate) last_checked: Option<Timestamp>,
    pub(crate) recursion_checked: Option<Timestamp>,
    pub(crate) erroneous: bool,
}

impl TypeData {
    pub(crate) fn new(kind: TypeKind, location: Location, module: ModuleId, asn: bool) -> Self {
        TypeData {
            kind,
            location,
            owner: TypeOwner::Anonymous(module),
            module,
            asn,
            subtype: None,
            last_checked: None,
            recursion_checked: None,
            erroneous: false,
        }
    }

    pub fn is_erroneous(&self) -> bool {
        self.erroneous
    }

    pub fn last_checked(&self) -> Option<Timestamp> {
        self.last_checked
    }
}
