//! Semantic errors and their diagnostics.
//!
//! Every recoverable problem the checker finds is a [`SemaError`]. Errors are
//! plain data; the checker turns them into diagnostics with
//! [`SemaError::to_diagnostic`] and reports them through the sink.

use ttcn_diagnostic::{Diagnostic, ErrorCode};
use ttcn_ir::Location;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SemaError {
    /// Value set of the found type is not inside the expected one.
    IncompatibleType {
        location: Location,
        expected: String,
        found: String,
        /// Rendered field paths, e.g. `op1.f[2]` vs `op2.g`.
        detail: Option<String>,
    },
    IncompatibleSubtype {
        location: Location,
        expected: String,
        found: String,
        detail: String,
    },
    UnresolvedReference {
        location: Location,
        name: String,
    },
    /// Reported once at each of the two locations; `first` tells which.
    DuplicateDefinition {
        name: String,
        location: Location,
        other: Location,
        first: bool,
    },
    CircularReference {
        location: Location,
        chain: String,
    },
    CircularImport {
        location: Location,
        chain: String,
    },
    ParameterMismatch {
        location: Location,
        message: String,
    },
    NonexistentField {
        location: Location,
        message: String,
    },
    UnknownModule {
        location: Location,
        name: String,
    },
    ValueMismatch {
        location: Location,
        message: String,
    },
    NotVisible {
        location: Location,
        name: String,
        module: String,
    },
    /// A local definition hides one of an enclosing scope.
    NotUnique {
        location: Location,
        name: String,
        hidden: Location,
    },
    WrongKind {
        location: Location,
        name: String,
        expected: &'static str,
        found: &'static str,
    },
    UnusedDefinition {
        location: Location,
        description: &'static str,
        name: String,
    },
    UnusedImport {
        location: Location,
        module: String,
    },
    NamingConvention {
        location: Location,
        description: &'static str,
        name: String,
        rule: String,
    },
    /// Internal invariant violation.
    Internal {
        location: Location,
        message: String,
    },
    RecursionBudget {
        location: Location,
        limit: usize,
    },
}

impl SemaError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SemaError::IncompatibleType { .. } => ErrorCode::E2001,
            SemaError::IncompatibleSubtype { .. } => ErrorCode::E2002,
            SemaError::UnresolvedReference { .. } => ErrorCode::E2003,
            SemaError::DuplicateDefinition { .. } => ErrorCode::E2004,
            SemaError::CircularReference { .. } => ErrorCode::E2005,
            SemaError::CircularImport { .. } => ErrorCode::E2006,
            SemaError::ParameterMismatch { .. } => ErrorCode::E2007,
            SemaError::NonexistentField { .. } => ErrorCode::E2008,
            SemaError::UnknownModule { .. } => ErrorCode::E2009,
            SemaError::ValueMismatch { .. } => ErrorCode::E2010,
            SemaError::NotVisible { .. } => ErrorCode::E2011,
            SemaError::NotUnique { .. } => ErrorCode::E2012,
            SemaError::WrongKind { .. } => ErrorCode::E2013,
            SemaError::Internal { .. } => ErrorCode::E9001,
            SemaError::RecursionBudget { .. } => ErrorCode::E9002,
            SemaError::UnusedDefinition { .. } => ErrorCode::W1001,
            SemaError::UnusedImport { .. } => ErrorCode::W1002,
            SemaError::NamingConvention { .. } => ErrorCode::W1003,
        }
    }

    /// Location the diagnostic is reported at.
    pub fn location(&self) -> Location {
        match self {
            SemaError::IncompatibleType { location, .. }
            | SemaError::IncompatibleSubtype { location, .. }
            | SemaError::UnresolvedReference { location, .. }
            | SemaError::DuplicateDefinition { location, .. }
            | SemaError::CircularReference { location, .. }
            | SemaError::CircularImport { location, .. }
            | SemaError::ParameterMismatch { location, .. }
            | SemaError::NonexistentField { location, .. }
            | SemaError::UnknownModule { location, .. }
            | SemaError::ValueMismatch { location, .. }
            | SemaError::NotVisible { location, .. }
            | SemaError::NotUnique { location, .. }
            | SemaError::WrongKind { location, .. }
            | SemaError::UnusedDefinition { location, .. }
            | SemaError::UnusedImport { location, .. }
            | SemaError::NamingConvention { location, .. }
            | SemaError::Internal { location, .. }
            | SemaError::RecursionBudget { location, .. } => *location,
        }
    }

    /// Convert to a diagnostic with the code's default severity.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = self.code();
        let base = if code.is_warning() {
            Diagnostic::warning(code)
        } else {
            Diagnostic::error(code)
        };

        match self {
            SemaError::IncompatibleType {
                location,
                expected,
                found,
                detail,
            } => {
                let diag = base
                    .with_message(format!(
                        "type mismatch: expected `{expected}`, found `{found}`"
                    ))
                    .with_label(*location, format!("expected `{expected}`"));
                match detail {
                    Some(detail) => diag.with_note(detail.clone()),
                    None => diag,
                }
            }
            SemaError::IncompatibleSubtype {
                location,
                expected,
                found,
                detail,
            } => base
                .with_message(format!(
                    "subtype of `{found}` is not compatible with subtype of `{expected}`"
                ))
                .with_label(*location, "incompatible restrictions")
                .with_note(detail.clone()),
            SemaError::UnresolvedReference { location, name } => base
                .with_message(format!("there is no definition with name `{name}` visible here"))
                .with_label(*location, "not found in this scope"),
            SemaError::DuplicateDefinition {
                name,
                location,
                other,
                first,
            } => {
                if *first {
                    base.with_message(format!("definition with name `{name}` is duplicated"))
                        .with_label(*location, "first defined here")
                        .with_secondary_label(*other, "redefined here")
                } else {
                    base.with_message(format!("duplicate definition with name `{name}`"))
                        .with_label(*location, "redefined here")
                        .with_secondary_label(*other, "previous definition here")
                }
            }
            SemaError::CircularReference { location, chain } => base
                .with_message(format!("circular reference chain: `{chain}`"))
                .with_label(*location, "part of the cycle"),
            SemaError::CircularImport { location, chain } => base
                .with_message(format!("circular module importation chain: `{chain}`"))
                .with_label(*location, "part of the cycle"),
            SemaError::ParameterMismatch { location, message } => base
                .with_message(message.clone())
                .with_label(*location, "in this parameter list"),
            SemaError::NonexistentField { location, message } => base
                .with_message(message.clone())
                .with_label(*location, "invalid sub-reference"),
            SemaError::UnknownModule { location, name } => base
                .with_message(format!("there is no module with name `{name}`"))
                .with_label(*location, "unknown module"),
            SemaError::ValueMismatch { location, message } => base
                .with_message(message.clone())
                .with_label(*location, "in this value"),
            SemaError::NotVisible {
                location,
                name,
                module,
            } => base
                .with_message(format!(
                    "definition `{name}` of module `{module}` is not visible here"
                ))
                .with_label(*location, "not visible"),
            SemaError::NotUnique {
                location,
                name,
                hidden,
            } => base
                .with_message(format!(
                    "definition with name `{name}` is not unique in the scope hierarchy"
                ))
                .with_label(*location, "this definition")
                .with_secondary_label(*hidden, "hides this one"),
            SemaError::WrongKind {
                location,
                name,
                expected,
                found,
            } => base
                .with_message(format!("`{name}` is a {found}, but a {expected} was expected"))
                .with_label(*location, format!("expected a {expected}")),
            SemaError::UnusedDefinition {
                location,
                description,
                name,
            } => base
                .with_message(format!("the {description} `{name}` is never used"))
                .with_label(*location, "defined here"),
            SemaError::UnusedImport { location, module } => base
                .with_message(format!("nothing is used from the imported module `{module}`"))
                .with_label(*location, "unused import"),
            SemaError::NamingConvention {
                location,
                description,
                name,
                rule,
            } => base
                .with_message(format!(
                    "the name `{name}` of the {description} violates the naming convention"
                ))
                .with_label(*location, "here")
                .with_note(rule.clone()),
            SemaError::Internal { location, message } => base
                .with_message(format!("internal error: {message}"))
                .with_label(*location, "while checking this"),
            SemaError::RecursionBudget { location, limit } => base
                .with_message(format!(
                    "recursion budget of {limit} nested checks exhausted"
                ))
                .with_label(*location, "nesting too deep"),
        }
    }
}
