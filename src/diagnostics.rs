//! Diagnostic formatting utilities for the hypofix CLI.

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use hypofix_front::ParseError;

/// Normalize a span to ensure end > start (required by ariadne).
pub fn normalize_span(start: usize, end: usize) -> (usize, usize) {
    (start, end.max(start + 1))
}

/// Print a parse error using ariadne for pretty output.
pub fn print_parse_error(error: &ParseError, source: &str, file_path: &str) {
    // A span at end of input still needs one byte to point at.
    let start = error.span.start.min(source.len().saturating_sub(1));
    let (start, end) = normalize_span(start, error.span.end);

    Report::build(ReportKind::Error, (file_path, start..end))
        .with_config(Config::default().with_index_type(IndexType::Byte))
        .with_code("parse")
        .with_message("could not parse source; file left unchanged")
        .with_label(
            Label::new((file_path, start..end))
                .with_message(&error.message)
                .with_color(Color::Red),
        )
        .finish()
        .eprint((file_path, Source::from(source)))
        .ok();
}
