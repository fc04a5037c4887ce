//! Collector for accumulating diagnostics while parsing.
//!
//! The [`DiagnosticCollector`] lets the parser keep going after a malformed
//! fragment and hand every warning back to the caller at the end.

use crate::error::{Diagnostic, ParseError};

/// A collector for accumulating diagnostics during a parse.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        log::debug!(code:? = diagnostic.code(); "{}", diagnostic.message());
        self.diagnostics.push(diagnostic);
    }

    /// Returns `true` if any error has been emitted.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Finish collection.
    ///
    /// - If there are errors, returns `Err(ParseError)` with all diagnostics.
    /// - Otherwise returns the collected warnings.
    pub fn finish(self) -> Result<Vec<Diagnostic>, ParseError> {
        if self.has_errors {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_collector_returns_warnings() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(
            Diagnostic::warning("malformed attribute")
                .with_code(ErrorCode::W201)
                .with_label(Span::new(0..3), "skipped"),
        );

        assert!(!collector.has_errors());
        let warnings = collector.finish().expect("no errors emitted");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_collector_with_error() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("skipped"));
        collector.emit(Diagnostic::error("empty input").with_code(ErrorCode::E100));

        let err = collector.finish().expect_err("error emitted");
        assert_eq!(err.diagnostics().len(), 2);
    }
}
