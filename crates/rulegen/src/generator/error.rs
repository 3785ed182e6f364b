//! Error types for text generation.

use thiserror::Error;

use crate::condition::{ConditionError, EvalError};
use crate::rules::display_name;

/// An error that stopped a generation run. No partial text is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// The rule map has no root rule.
    #[error("rule map has no root rule (a rule named \"\")")]
    MissingRoot,

    /// A template references a rule that does not exist.
    #[error(
        "rule '{}' branch {branch}: unknown rule '{reference}'",
        display_name(rule)
    )]
    UnknownRule {
        rule: String,
        branch: usize,
        reference: String,
    },

    /// A data rule reads a key the data context does not have.
    #[error("rule '{}': data key '{key}' is not in the context", display_name(rule))]
    MissingData { rule: String, key: String },

    /// A branch condition does not lex or parse.
    #[error("rule '{}' branch {branch}: invalid condition: {source}", display_name(rule))]
    InvalidCondition {
        rule: String,
        branch: usize,
        #[source]
        source: ConditionError,
    },

    /// A branch condition failed while evaluating.
    #[error("rule '{}' branch {branch}: {source}", display_name(rule))]
    Evaluation {
        rule: String,
        branch: usize,
        #[source]
        source: EvalError,
    },

    /// A data value could not be formatted.
    #[error("rule '{}': {source}", display_name(rule))]
    Format {
        rule: String,
        #[source]
        source: FormatError,
    },

    /// Expansion nested deeper than the configured limit.
    #[error("maximum expansion depth {limit} exceeded at rule '{}'", display_name(rule))]
    MaxDepthExceeded { limit: usize, rule: String },
}

/// A data value that does not fit its rule's format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("'{value}' is not a date")]
    InvalidDate { value: String },

    #[error("invalid date pattern '{pattern}'")]
    InvalidPattern { pattern: String },

    #[error("'{value}' is not a number")]
    NotANumber { value: String },
}
