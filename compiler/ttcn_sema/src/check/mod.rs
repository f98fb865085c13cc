//! The check pass.
//!
//! A pass runs under one timestamp and walks every module: imports are
//! resolved and checked for cycles, then each scope's declarations are
//! checked in table order. Checking a declaration resolves the references in
//! its type and value, which re-enters declaration checking for the targets;
//! the timestamp guard makes that re-entry cheap and the recursion budget
//! keeps it bounded.

mod assignments;
mod reports;
mod statements;
mod types;
mod values;

use rustc_hash::FxHashSet;
use ttcn_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode, ReportMode, Severity};
use ttcn_ir::{ModuleId, Timestamp};
use ttcn_stack::DepthBudget;

use crate::chain::{ChainPool, Link, ModuleImportationChain, ModuleLink};
use crate::config::CheckConfig;
use crate::error::SemaError;
use crate::graph::ModuleGraph;

/// State of one running check pass.
///
/// Besides driving the whole pass through [`check_all`](Self::check_all),
/// a checker answers single questions for embedders: resolving one
/// reference, checking one declaration, testing two types for
/// compatibility.
pub struct Checker<'a> {
    pub(crate) graph: &'a mut ModuleGraph,
    pub(crate) config: &'a CheckConfig,
    pub(crate) sink: &'a mut DiagnosticSink,
    pub(crate) timestamp: Timestamp,
    pub(crate) budget: DepthBudget,
    pub(crate) pool: ChainPool<Link>,
}

impl<'a> Checker<'a> {
    pub fn new(
        graph: &'a mut ModuleGraph,
        config: &'a CheckConfig,
        sink: &'a mut DiagnosticSink,
        timestamp: Timestamp,
    ) -> Self {
        Checker {
            graph,
            config,
            sink,
            timestamp,
            budget: DepthBudget::new(config.recursion_limit),
            pool: ChainPool::new(config.reuse_chains),
        }
    }

    pub fn graph(&self) -> &ModuleGraph {
        self.graph
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Report with the default severity of the error's code.
    pub(crate) fn report(&mut self, error: SemaError) {
        self.sink.report(error.to_diagnostic(), ReportMode::Singular);
    }

    pub(crate) fn report_with(&mut self, error: SemaError, severity: Severity) {
        self.sink
            .report(error.to_diagnostic().severity(severity), ReportMode::Singular);
    }

    /// Internal invariant violation: reported, never fatal.
    pub(crate) fn internal(&mut self, location: ttcn_ir::Location, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(?location, %message, "internal invariant violated");
        self.report(SemaError::Internal { location, message });
    }

    /// Run the whole pass.
    ///
    /// The first full pass under a newer timestamp drops the erroneous and
    /// used marks left by earlier ones.
    #[tracing::instrument(level = "debug", skip_all, fields(timestamp = self.timestamp.raw()))]
    pub fn check_all(&mut self) {
        self.graph.begin_pass(self.timestamp);
        self.check_imports();
        let modules: Vec<ModuleId> = self.graph.module_ids().collect();
        for module in modules {
            self.check_module(module);
        }
        self.report_unused();
        self.report_naming();
    }

    #[tracing::instrument(level = "debug", skip_all, fields(module = self.graph.module_name(module)))]
    pub fn check_module(&mut self, module: ModuleId) {
        let root = self.graph.module(module).scope;
        self.check_scope(root);
    }

    /// Resolve every import clause and look for importation cycles.
    pub(crate) fn check_imports(&mut self) {
        let modules: Vec<ModuleId> = self.graph.module_ids().collect();
        for &module in &modules {
            for index in 0..self.graph.module(module).imports.len() {
                let import = &self.graph.module(module).imports[index];
                let (name, location) = (import.module_name, import.location);
                let resolved = self.graph.module_by_name(name);
                if resolved.is_none() {
                    let name = self.graph.display_in(module, name).to_owned();
                    self.report(SemaError::UnknownModule { location, name });
                }
                self.graph.module_mut(module).imports[index].resolved = resolved;
            }
        }

        let severity = self.config.circular_import.severity();
        for &root in &modules {
            let mut chain = ModuleImportationChain::new(severity);
            let mut visited = FxHashSet::default();
            visited.insert(root);
            let link = ModuleLink {
                module: root,
                name: self.graph.module(root).name,
            };
            chain.add(link, self.graph, self.sink);
            self.import_cycles(root, &mut chain, &mut visited);
        }
    }

    fn import_cycles(
        &mut self,
        module: ModuleId,
        chain: &mut ModuleImportationChain,
        visited: &mut FxHashSet<ModuleId>,
    ) {
        let targets: Vec<ModuleId> = self
            .graph
            .module(module)
            .imports
            .iter()
            .filter_map(|i| i.resolved)
            .collect();
        for target in targets {
            let link = ModuleLink {
                module: target,
                name: self.graph.module(target).name,
            };
            chain.mark_state();
            if chain.add(link, self.graph, self.sink) && visited.insert(target) {
                ttcn_stack::ensure_sufficient_stack(|| {
                    self.import_cycles(target, chain, visited);
                });
            }
            chain.previous_state();
        }
    }
}

/// Diagnostics of one finished pass.
#[derive(Clone, Debug, Default)]
pub struct CheckResult {
    /// Sorted by primary location.
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn with_code(&self, code: ErrorCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    pub fn count(&self, code: ErrorCode) -> usize {
        self.with_code(code).count()
    }
}

/// Check every module of `graph` under `timestamp`.
pub fn check_modules(
    graph: &mut ModuleGraph,
    config: &CheckConfig,
    timestamp: Timestamp,
) -> CheckResult {
    let mut sink = DiagnosticSink::new();
    Checker::new(graph, config, &mut sink, timestamp).check_all();
    CheckResult {
        diagnostics: sink.flush(),
    }
}
