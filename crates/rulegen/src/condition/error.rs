//! Error types for the condition language.

use thiserror::Error;

use super::ast::BinaryOp;

/// A malformed token in a condition string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A character that starts no token.
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedCharacter { offset: usize, found: char },

    /// A `'` with no closing quote.
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    /// A `[[` with no closing `]]`.
    #[error("unterminated variable reference starting at offset {offset}")]
    UnterminatedVariable { offset: usize },
}

impl LexError {
    /// Byte offset of the offending input.
    pub fn offset(&self) -> usize {
        match self {
            LexError::UnexpectedCharacter { offset, .. }
            | LexError::UnterminatedString { offset }
            | LexError::UnterminatedVariable { offset } => *offset,
        }
    }
}

/// A token sequence that does not form a valid expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (token {position}, offset {offset})")]
pub struct ParseError {
    /// Human-readable reason.
    pub message: String,
    /// Index of the offending token.
    pub position: usize,
    /// Byte offset of the offending token.
    pub offset: usize,
}

/// Any failure turning condition text into an expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ConditionError {
    /// Byte offset in the condition source where the problem was found.
    pub fn offset(&self) -> usize {
        match self {
            ConditionError::Lex(e) => e.offset(),
            ConditionError::Parse(e) => e.offset,
        }
    }
}

/// An error that occurred while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Right-hand side of `/` or `%` was zero.
    #[error("division by zero in '{}'", operator.symbol())]
    DivisionByZero { operator: BinaryOp },

    /// An operand could not be coerced to a number.
    #[error("operator '{operator}' needs numeric operands, found {found}")]
    TypeMismatch {
        operator: &'static str,
        found: String,
    },

    /// Variable missing from the data context.
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String },
}
