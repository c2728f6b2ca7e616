//! Error adapter for converting [`CliError`] to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error
//! types and miette's rich diagnostic formatting used in the CLI. Parse
//! errors carry a source span, so they render with a labeled snippet of
//! the offending file; other errors render as plain reports.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use copperline_parser::{error::ParseError, span::Span};

use crate::CliError;

/// Adapter wrapping a [`CliError`] for rendering with miette.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CliError::Io(_) => "copperline::io",
            CliError::Config(_) => "copperline::config",
            CliError::Parse { err, .. } => match err {
                ParseError::Lex(_) => "copperline::lex",
                ParseError::Structure(_) => "copperline::structure",
                ParseError::Schema(_) => "copperline::schema",
            },
            CliError::Json(_) => "copperline::json",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            CliError::Parse {
                err: ParseError::Schema(_),
                ..
            } => Some(Box::new(
                "rerun with --strictness permissive to skip unrecognized content",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match &self.0 {
            CliError::Parse { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let CliError::Parse { err, .. } = &self.0 else {
            return None;
        };
        let span = span_to_miette(err.span());
        let label = LabeledSpan::new_primary_with_span(Some("here".to_string()), span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Convert a parser [`Span`] to a miette [`SourceSpan`].
fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start.into(), span.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    use copperline_parser::error::StructureError;

    #[test]
    fn test_parse_error_renders_with_label() {
        let src = "(a))".to_string();
        let err = CliError::Parse {
            err: StructureError::UnmatchedClose { offset: 3 }.into(),
            src,
        };

        let adapter = ErrorAdapter(&err);
        assert!(adapter.source_code().is_some());
        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 3);
    }

    #[test]
    fn test_io_error_has_no_source_code() {
        let err = CliError::Io(std::io::Error::other("boom"));
        let adapter = ErrorAdapter(&err);
        assert!(adapter.source_code().is_none());
        assert!(adapter.labels().is_none());
        assert_eq!(adapter.code().unwrap().to_string(), "copperline::io");
    }
}
