//! Miette diagnostic wrapper for condition syntax errors.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![allow(unused_assignments)]

use miette::{Diagnostic, NamedSource, SourceSpan};
use rulegen::{ConditionError, LexError};
use thiserror::Error;

/// A miette-compatible diagnostic for condition syntax errors.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("syntax error: {message}")]
#[diagnostic(code(rulegen::condition))]
pub struct ConditionDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl ConditionDiagnostic {
    /// Create a diagnostic pointing into the condition source.
    ///
    /// `origin` names where the condition came from, e.g. a rule and branch.
    pub fn new(origin: impl Into<String>, condition: &str, err: &ConditionError) -> Self {
        let (message, help) = match err {
            ConditionError::Lex(lex) => (lex.to_string(), lex_help(lex)),
            ConditionError::Parse(parse) => (parse.message.clone(), None),
        };

        let name: String = origin.into();

        // Clamp offset to content length to avoid miette panic on out-of-bounds
        let offset = err.offset().min(condition.len());
        let length = usize::from(offset < condition.len());

        ConditionDiagnostic {
            src: NamedSource::new(name, condition.to_string()),
            span: (offset, length).into(),
            message,
            help,
        }
    }
}

fn lex_help(err: &LexError) -> Option<String> {
    match err {
        LexError::UnexpectedCharacter { found: '=', .. } => {
            Some("use '==' to compare values".to_string())
        }
        LexError::UnexpectedCharacter { found: '&', .. } => Some("use '&&' for 'and'".to_string()),
        LexError::UnexpectedCharacter { found: '|', .. } => Some("use '||' for 'or'".to_string()),
        LexError::UnexpectedCharacter { found: '"', .. } => {
            Some("strings are written with single quotes".to_string())
        }
        LexError::UnterminatedString { .. } => {
            Some("close the string with ' (write \\' for a quote inside it)".to_string())
        }
        LexError::UnterminatedVariable { .. } => Some("close the variable with ]]".to_string()),
        LexError::UnexpectedCharacter { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulegen::parse_condition;

    #[test]
    fn span_points_at_offending_character() {
        let err = parse_condition("x = 1").unwrap_err();
        let diagnostic = ConditionDiagnostic::new("condition", "x = 1", &err);
        assert_eq!(diagnostic.span.offset(), 2);
        assert_eq!(diagnostic.span.len(), 1);
        assert_eq!(diagnostic.help.as_deref(), Some("use '==' to compare values"));
    }

    #[test]
    fn span_at_end_of_input_is_empty() {
        let err = parse_condition("1 +").unwrap_err();
        let diagnostic = ConditionDiagnostic::new("condition", "1 +", &err);
        assert_eq!(diagnostic.span.offset(), 3);
        assert_eq!(diagnostic.span.len(), 0);
        assert_eq!(diagnostic.message, "unexpected end of input");
    }
}
