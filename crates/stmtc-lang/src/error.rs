//! Error type for malformed query text.

use crate::span::{offset_to_line_col, Span};
use thiserror::Error;

/// A structural error found while scanning a query.
///
/// The tokenizer itself never fails; this error is raised by consumers that
/// find an unexpected token or run out of input.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// Source span where the error occurred.
    pub span: Span,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Add a hint to the error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Format the error with source context.
    pub fn format_with_source(&self, source: &str) -> String {
        let (line, col) = offset_to_line_col(source, self.span.start);
        let mut result = format!("error: {}\n", self.message);
        result.push_str(&format!("  --> line {}:{}\n", line, col));

        if let Some(source_line) = source.lines().nth(line - 1) {
            result.push_str(&format!("   |\n{:3}| {}\n   |", line, source_line));

            for _ in 0..col {
                result.push(' ');
            }
            result.push('^');

            let span_len = self.span.len();
            let room = source_line.len().saturating_sub(col) + 1;
            for _ in 1..span_len.min(room) {
                result.push('~');
            }
            result.push('\n');
        }

        if let Some(hint) = &self.hint {
            result.push_str(&format!("   = hint: {}\n", hint));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting() {
        let source = "UPDATE Employee e SET x.salary = :s";
        let err = ParseError::new("column 'x.salary' does not use alias 'e'", Span::new(22, 30))
            .with_hint("qualify columns as 'e.<field>'");

        let formatted = err.format_with_source(source);
        assert!(formatted.contains("line 1:23"));
        assert!(formatted.contains("does not use alias 'e'"));
        assert!(formatted.contains("^~~~"));
        assert!(formatted.contains("hint: qualify columns"));
    }

    #[test]
    fn test_error_at_end_of_input() {
        let source = "DELETE FROM";
        let err = ParseError::new("expected table name", Span::eof(source));

        let formatted = err.format_with_source(source);
        assert!(formatted.contains("line 1:12"));
        assert!(!formatted.contains('~'));
    }
}
