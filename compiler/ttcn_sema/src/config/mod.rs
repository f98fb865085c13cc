//! Per-pass check configuration.

use ttcn_diagnostic::Severity;

use crate::symbols::{AssignmentKind, ParameterKind};

/// How an optional report is emitted.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum ReportLevel {
    #[default]
    Ignore,
    Warning,
    Error,
}

impl ReportLevel {
    /// Severity to report with, `None` when the report is suppressed.
    pub fn severity(self) -> Option<Severity> {
        match self {
            ReportLevel::Ignore => None,
            ReportLevel::Warning => Some(Severity::Warning),
            ReportLevel::Error => Some(Severity::Error),
        }
    }
}

/// Which notion of type compatibility the pass applies.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum CompatibilityMode {
    /// Same shape is enough.
    #[default]
    Structural,
    /// Structured types must be the identical declared type.
    Nominal,
}

/// Required identifier prefixes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NamingConventions {
    pub constant: String,
    pub template: String,
    pub function: String,
    pub altstep: String,
    pub testcase: String,
    pub variable: String,
    pub timer: String,
    pub port: String,
    pub formal_parameter: String,
    pub module_parameter: String,
    /// Type names start with an upper-case letter.
    pub type_upper_case: bool,
}

impl Default for NamingConventions {
    fn default() -> Self {
        NamingConventions {
            constant: "c_".into(),
            template: "t_".into(),
            function: "f_".into(),
            altstep: "as_".into(),
            testcase: "tc_".into(),
            variable: "v_".into(),
            timer: "T_".into(),
            port: "p_".into(),
            formal_parameter: "pl_".into(),
            module_parameter: "tsp_".into(),
            type_upper_case: true,
        }
    }
}

impl NamingConventions {
    /// Required prefix for a kind of declaration, if any.
    pub fn prefix(&self, kind: AssignmentKind) -> Option<&str> {
        let prefix = match kind {
            AssignmentKind::Const | AssignmentKind::ExternalConst => &self.constant,
            AssignmentKind::Template | AssignmentKind::VarTemplate => &self.template,
            AssignmentKind::Function | AssignmentKind::ExternalFunction => &self.function,
            AssignmentKind::Altstep => &self.altstep,
            AssignmentKind::Testcase => &self.testcase,
            AssignmentKind::Var => &self.variable,
            AssignmentKind::Timer => &self.timer,
            AssignmentKind::Port => &self.port,
            AssignmentKind::ModulePar => &self.module_parameter,
            AssignmentKind::Parameter(ParameterKind::Timer) => &self.timer,
            AssignmentKind::Parameter(_) => &self.formal_parameter,
            AssignmentKind::Type
            | AssignmentKind::AsnValueSet
            | AssignmentKind::AsnObject
            | AssignmentKind::AsnObjectClass
            | AssignmentKind::AsnObjectSet => return None,
        };
        (!prefix.is_empty()).then_some(prefix.as_str())
    }

    /// Rule violated by `name`, rendered for the diagnostic note.
    pub fn violation(&self, kind: AssignmentKind, name: &str) -> Option<String> {
        if kind == AssignmentKind::Type {
            let upper = name.chars().next().is_some_and(char::is_uppercase);
            return (self.type_upper_case && !upper)
                .then(|| "type names start with an upper-case letter".to_owned());
        }
        let prefix = self.prefix(kind)?;
        (!name.starts_with(prefix)).then(|| format!("expected the prefix `{prefix}`"))
    }
}

/// Settings of one check pass.
#[derive(Clone, Debug)]
pub struct CheckConfig {
    pub unused_definition: ReportLevel,
    pub unused_import: ReportLevel,
    pub naming_convention: ReportLevel,
    pub circular_import: ReportLevel,
    pub compatibility: CompatibilityMode,
    /// Severity of type incompatibilities.
    pub compatibility_severity: Severity,
    pub naming: NamingConventions,
    /// Maximum number of nested declaration checks.
    pub recursion_limit: usize,
    /// Reuse cycle-detection chains through a pool.
    pub reuse_chains: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            unused_definition: ReportLevel::Warning,
            unused_import: ReportLevel::Warning,
            naming_convention: ReportLevel::Ignore,
            circular_import: ReportLevel::Warning,
            compatibility: CompatibilityMode::Structural,
            compatibility_severity: Severity::Error,
            naming: NamingConventions::default(),
            recursion_limit: 10_000,
            reuse_chains: false,
        }
    }
}

impl CheckConfig {
    /// No optional reports; only hard errors.
    pub fn quiet() -> Self {
        CheckConfig {
            unused_definition: ReportLevel::Ignore,
            unused_import: ReportLevel::Ignore,
            circular_import: ReportLevel::Ignore,
            ..CheckConfig::default()
        }
    }

    /// Every optional report as an error, nominal compatibility.
    pub fn strict() -> Self {
        CheckConfig {
            unused_definition: ReportLevel::Error,
            unused_import: ReportLevel::Error,
            naming_convention: ReportLevel::Error,
            circular_import: ReportLevel::Error,
            compatibility: CompatibilityMode::Nominal,
            ..CheckConfig::default()
        }
    }
}
