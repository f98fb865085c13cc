//! Value nodes.

use ttcn_ir::{Identifier, Location, ModuleId, ReferenceId, ValueId};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Verdict {
    None,
    Pass,
    Inconc,
    Fail,
    Error,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Rem,
    Concat,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Xor,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "mod",
            BinaryOp::Rem => "rem",
            BinaryOp::Concat => "&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod | BinaryOp::Rem
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or | BinaryOp::Xor)
    }
}

/// Named component of a record/set value.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NamedValue {
    pub name: Identifier,
    pub value: ValueId,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ValueKind {
    Integer(i64),
    /// Stored as bits so values stay `Eq`.
    Real(u64),
    Boolean(bool),
    Charstring(String),
    Bitstring(String),
    Hexstring(String),
    Octetstring(String),
    Verdict(Verdict),
    Omit,
    Null,
    /// `{ a := 1, b := 2 }`
    Sequence(Vec<NamedValue>),
    /// `{ 1, 2, 3 }`
    SequenceOf(Vec<ValueId>),
    Reference(ReferenceId),
    Unary(UnaryOp, ValueId),
    Binary(BinaryOp, ValueId, ValueId),
}

impl ValueKind {
    pub fn real(value: f64) -> Self {
        ValueKind::Real(value.to_bits())
    }

    pub fn description(&self) -> &'static str {
        match self {
            ValueKind::Integer(_) => "integer value",
            ValueKind::Real(_) => "float value",
            ValueKind::Boolean(_) => "boolean value",
            ValueKind::Charstring(_) => "character string value",
            ValueKind::Bitstring(_) => "bitstring value",
            ValueKind::Hexstring(_) => "hexstring value",
            ValueKind::Octetstring(_) => "octetstring value",
            ValueKind::Verdict(_) => "verdict value",
            ValueKind::Omit => "omit",
            ValueKind::Null => "null value",
            ValueKind::Sequence(_) => "record or set value",
            ValueKind::SequenceOf(_) => "value list",
            ValueKind::Reference(_) => "reference",
            ValueKind::Unary(..) | ValueKind::Binary(..) => "expression",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ValueData {
    pub kind: ValueKind,
    pub location: Location,
    pub module: ModuleId,
    pub(crate) erroneous: bool,
}

impl ValueData {
    pub fn is_erroneous(&self) -> bool {
        self.erroneous
    }
}
