//! Branch output templates and their winnow parser.
//!
//! A template is literal text with embedded rule references:
//! - `@name` references the rule `name` (ASCII letters, digits, `_`)
//! - `{{any name}}` references a rule whose name needs other characters
//! - `@@` is a literal `@`; an `@` not followed by a name character is
//!   literal too
//!
//! Nothing else is interpreted; there are no expressions inside templates.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use winnow::combinator::{alt, cut_err, delimited, preceded, repeat};
use winnow::prelude::*;
use winnow::token::{any, take_until, take_while};

use crate::condition::lexer::is_ident_cont;

/// A parsed output template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Template {
    segments: Vec<Segment>,
}

/// A segment within a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text, emitted verbatim.
    Literal(String),
    /// A reference to another rule, expanded recursively.
    Reference(String),
}

/// A template string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid template at column {column}: {message}")]
pub struct TemplateError {
    pub column: usize,
    pub message: String,
}

impl Template {
    /// Parse template text.
    ///
    /// # Example
    ///
    /// ```
    /// use rulegen::{Segment, Template};
    ///
    /// let template = Template::parse("Dear @name, see {{fine print}}.").unwrap();
    /// assert_eq!(
    ///     template.references().collect::<Vec<_>>(),
    ///     vec!["name", "fine print"]
    /// );
    /// assert_eq!(template.segments()[0], Segment::Literal("Dear ".to_string()));
    /// ```
    pub fn parse(input: &str) -> Result<Self, TemplateError> {
        let mut remaining = input;
        match template(&mut remaining) {
            Ok(t) if remaining.is_empty() => Ok(t),
            Ok(_) => Err(TemplateError {
                column: column(input, remaining),
                message: format!(
                    "unexpected character: '{}'",
                    remaining.chars().next().unwrap_or('?')
                ),
            }),
            Err(_) => Err(TemplateError {
                column: column(input, remaining),
                message: "unterminated or empty '{{' reference".to_string(),
            }),
        }
    }

    /// Build a template directly from segments.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self {
            segments: merge_literals(segments),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of referenced rules, in template order (repeats included).
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Reference(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

/// Calculate the 1-based character column of the remaining input.
fn column(original: &str, remaining: &str) -> usize {
    let consumed = original.len() - remaining.len();
    original[..consumed].chars().count() + 1
}

/// Parse a complete template into segments.
fn template(input: &mut &str) -> ModalResult<Template> {
    let segments: Vec<Segment> = repeat(0.., segment).parse_next(input)?;
    Ok(Template {
        segments: merge_literals(segments),
    })
}

/// Merge adjacent Literal segments into single segments.
fn merge_literals(segments: Vec<Segment>) -> Vec<Segment> {
    let mut result = Vec::with_capacity(segments.len());

    for segment in segments {
        match segment {
            Segment::Literal(text) => {
                if let Some(Segment::Literal(prev)) = result.last_mut() {
                    prev.push_str(&text);
                } else if !text.is_empty() {
                    result.push(Segment::Literal(text));
                }
            }
            other => result.push(other),
        }
    }

    result
}

/// Parse a single segment (escape, reference, or literal).
fn segment(input: &mut &str) -> ModalResult<Segment> {
    alt((escaped_at, braced_reference, at_reference, literal_char)).parse_next(input)
}

/// Parse `@@` as a literal `@`.
fn escaped_at(input: &mut &str) -> ModalResult<Segment> {
    "@@".value(Segment::Literal("@".to_string()))
        .parse_next(input)
}

/// Parse `{{name}}`. Once `{{` is seen the reference must be closed.
fn braced_reference(input: &mut &str) -> ModalResult<Segment> {
    preceded(
        "{{",
        cut_err(delimited(
            take_while(0.., ' '),
            take_until(1.., "}}"),
            "}}",
        )),
    )
    .map(|name: &str| Segment::Reference(name.trim_end().to_string()))
    .parse_next(input)
}

/// Parse `@name`.
fn at_reference(input: &mut &str) -> ModalResult<Segment> {
    preceded('@', take_while(1.., is_ident_cont))
        .map(|name: &str| Segment::Reference(name.to_string()))
        .parse_next(input)
}

/// Parse a single literal character.
fn literal_char(input: &mut &str) -> ModalResult<Segment> {
    any.map(|c: char| Segment::Literal(c.to_string()))
        .parse_next(input)
}

impl Display for Template {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => write!(f, "{}", text.replace('@', "@@"))?,
                Segment::Reference(name) => write!(f, "{{{{{name}}}}}")?,
            }
        }
        Ok(())
    }
}

impl TryFrom<String> for Template {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Template::parse(&value)
    }
}

impl From<Template> for String {
    fn from(template: Template) -> Self {
        template.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_literals_are_merged() {
        let template = Template::parse("a@@b @ c").unwrap();
        assert_eq!(
            template.segments(),
            &[Segment::Literal("a@b @ c".to_string())]
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        let template = Template::parse("mail @@ @user: {{full name}}!").unwrap();
        let reparsed = Template::parse(&template.to_string()).unwrap();
        assert_eq!(template, reparsed);
    }

    #[test]
    fn unclosed_braces_are_an_error() {
        let err = Template::parse("Hello {{name").unwrap_err();
        assert!(err.message.contains("'{{'"));
        assert!(err.column > 6);
    }
}
