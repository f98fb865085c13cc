use super::*;
use pretty_assertions::assert_eq;
use ttcn_ir::SourceId;

fn at(start: u32, end: u32) -> Location {
    Location::at(SourceId::new(0), start, end)
}

fn cycle(start: u32) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2005)
        .with_message("circular reference: `c -> c`")
        .with_label(at(start, start + 1), "here")
}

#[test]
fn test_singular_filters_repeats() {
    let mut sink = DiagnosticSink::new();

    assert!(sink.report(cycle(4), ReportMode::Singular));
    assert!(!sink.report(cycle(4), ReportMode::Singular));
    // Same message at a different location is a new report.
    assert!(sink.report(cycle(9), ReportMode::Singular));

    assert_eq!(sink.len(), 2);
    assert_eq!(sink.error_count(), 2);
}

#[test]
fn test_unconditional_always_reports() {
    let mut sink = DiagnosticSink::new();

    assert!(sink.report_unconditional(cycle(4)));
    assert!(sink.report_unconditional(cycle(4)));
    assert_eq!(sink.len(), 2);

    // An unconditional report still counts for later singular ones.
    assert!(!sink.report_singular(cycle(4)));
}

#[test]
fn test_counts_by_severity() {
    let mut sink = DiagnosticSink::new();
    sink.report_singular(Diagnostic::warning(ErrorCode::W1001).with_label(at(0, 1), "unused"));
    sink.report_singular(cycle(2));

    assert_eq!(sink.warning_count(), 1);
    assert_eq!(sink.error_count(), 1);
    assert!(sink.has_errors().is_some());
    assert_eq!(sink.with_code(ErrorCode::W1001).count(), 1);
}

#[test]
fn test_emit_error_forces_error_severity() {
    let mut sink = DiagnosticSink::new();
    let diag = Diagnostic::warning(ErrorCode::E9002).with_label(at(1, 2), "too deep");

    let _proof = sink.emit_error(diag, ReportMode::Singular);
    assert_eq!(sink.error_count(), 1);
    assert!(sink.diagnostics()[0].is_error());
}

#[test]
fn test_no_errors_no_proof() {
    let mut sink = DiagnosticSink::new();
    sink.report_singular(Diagnostic::warning(ErrorCode::W1002).with_label(at(0, 1), "import"));
    assert!(sink.has_errors().is_none());
}

#[test]
fn test_flush_sorts_and_resets() {
    let mut sink = DiagnosticSink::new();
    sink.report_singular(cycle(30));
    sink.report_singular(cycle(10));
    sink.report_singular(cycle(20));

    let flushed = sink.flush();
    let starts: Vec<u32> = flushed
        .iter()
        .filter_map(|d| d.primary_location())
        .map(|l| l.span.start)
        .collect();
    assert_eq!(starts, vec![10, 20, 30]);

    assert!(sink.is_empty());
    assert_eq!(sink.error_count(), 0);
    // Dedup state is reset as well.
    assert!(sink.report_singular(cycle(10)));
}
