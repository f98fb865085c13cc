//! Diagnostic sink collecting the reports of one check pass.
//!
//! Two reporting modes:
//! - [`ReportMode::Singular`] drops a report whose primary location and
//!   message were already reported, so re-checking a node in a later pass
//!   (or reaching it along a second path) does not duplicate it;
//! - [`ReportMode::Unconditional`] always records.

use rustc_hash::FxHashSet;
use ttcn_ir::Location;

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed, Severity};

/// How a report interacts with earlier reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ReportMode {
    /// Report only if not already reported at this exact location + message.
    #[default]
    Singular,
    /// Always report.
    Unconditional,
}

/// Collects diagnostics in report order.
///
/// # Example
///
/// ```text
/// let mut sink = DiagnosticSink::new();
/// sink.report(diagnostic, ReportMode::Singular);
/// // ... more reports
/// let sorted = sink.flush();
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    /// `(primary location, message)` of every report so far.
    reported: FxHashSet<(Location, String)>,
    error_count: usize,
    warning_count: usize,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    ///
    /// Returns `true` if the diagnostic was added, `false` if a singular
    /// report was filtered as a repeat.
    pub fn report(&mut self, diag: Diagnostic, mode: ReportMode) -> bool {
        let location = diag.primary_location().unwrap_or(Location::DUMMY);
        let fresh = self.reported.insert((location, diag.message.clone()));
        if !fresh && mode == ReportMode::Singular {
            return false;
        }

        match diag.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Note => {}
        }
        self.diagnostics.push(diag);
        true
    }

    /// Shorthand for [`ReportMode::Singular`].
    pub fn report_singular(&mut self, diag: Diagnostic) -> bool {
        self.report(diag, ReportMode::Singular)
    }

    /// Shorthand for [`ReportMode::Unconditional`].
    pub fn report_unconditional(&mut self, diag: Diagnostic) -> bool {
        self.report(diag, ReportMode::Unconditional)
    }

    /// Emit an error diagnostic and get proof it was emitted.
    ///
    /// The diagnostic is forced to error severity; a filtered repeat still
    /// proves an identical error exists in the sink.
    pub fn emit_error(&mut self, diag: Diagnostic, mode: ReportMode) -> ErrorGuaranteed {
        self.report(diag.severity(Severity::Error), mode);
        ErrorGuaranteed::new()
    }

    /// Check if any errors were emitted and get proof if so.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics in report order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics carrying `code`, in report order.
    pub fn with_code(&self, code: ErrorCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    /// Sort diagnostics by primary location and return them.
    ///
    /// Clears the sink. The sort is stable, so reports at one location keep
    /// their report order.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut result = std::mem::take(&mut self.diagnostics);
        result.sort_by_key(|d| d.primary_location().unwrap_or(Location::DUMMY));

        self.reported.clear();
        self.error_count = 0;
        self.warning_count = 0;

        result
    }
}

#[cfg(test)]
mod tests;
