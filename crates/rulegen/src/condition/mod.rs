//! The condition language used by conditional rule branches.
//!
//! A condition is a small expression over the data context:
//! `[[test var]] * 2 < 16 && cool_beans == 'Cool beans!'`. This module
//! tokenizes and parses condition strings into an [`Expr`] tree, serializes
//! trees back to a canonical string, and evaluates them.

pub mod ast;
mod error;
mod eval;
pub mod lexer;
mod parser;
mod serialize;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use error::{ConditionError, EvalError, LexError, ParseError};
pub use eval::{evaluate, evaluate_condition};
pub(crate) use eval::evaluate_condition_tracked;
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::{MAX_NESTING, parse_condition, parse_tokens};
pub use serialize::serialize_condition;
