//! Canonical text form of expression trees.
//!
//! The output uses single spaces around binary operators and only the
//! parentheses required to keep the tree shape, so re-parsing it produces
//! an equivalent tree.

use std::fmt::{Display, Formatter, Result as FmtResult};

use super::ast::Expr;
use super::lexer::{is_ident_cont, is_ident_start};
use crate::types::Value;

/// Serialize an expression tree to its canonical condition string.
///
/// # Example
///
/// ```
/// use rulegen::{parse_condition, serialize_condition};
///
/// let expr = parse_condition("((2+3))*[[count]]>=x").unwrap();
/// assert_eq!(serialize_condition(&expr), "(2 + 3) * count >= x");
/// ```
pub fn serialize_condition(expr: &Expr) -> String {
    expr.to_string()
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Expr::Literal(value) => write_literal(f, value),
            Expr::Variable(name) => {
                if is_bare_name(name) {
                    write!(f, "{name}")
                } else {
                    write!(f, "[[{name}]]")
                }
            }
            Expr::Unary { op, operand } => {
                write!(f, "{}", op.symbol())?;
                write_operand(f, operand, binary_precedence(operand).is_some())
            }
            Expr::Binary { op, left, right } => {
                let precedence = op.precedence();
                let left_parens = binary_precedence(left).is_some_and(|p| p < precedence);
                // Left-associative: an equal-precedence right child must keep
                // its parentheses.
                let right_parens = binary_precedence(right).is_some_and(|p| p <= precedence);
                write_operand(f, left, left_parens)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, right, right_parens)
            }
        }
    }
}

fn write_operand(f: &mut Formatter<'_>, expr: &Expr, parens: bool) -> FmtResult {
    if parens {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

fn write_literal(f: &mut Formatter<'_>, value: &Value) -> FmtResult {
    match value {
        // The language has no negative literals; wrap them so they re-parse
        // as a negation.
        Value::Number(n) if *n < 0.0 => write!(f, "(-{})", Value::Number(-n)),
        Value::Number(_) | Value::Boolean(_) => write!(f, "{value}"),
        Value::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
    }
}

fn binary_precedence(expr: &Expr) -> Option<u8> {
    match expr {
        Expr::Binary { op, .. } => Some(op.precedence()),
        _ => None,
    }
}

/// Whether a variable name can be written without `[[ ]]`.
fn is_bare_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = chars.next().is_some_and(is_ident_start);
    starts_ok && chars.all(is_ident_cont) && name != "true" && name != "false"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ast::BinaryOp;

    #[test]
    fn right_nested_same_precedence_keeps_parentheses() {
        let expr = Expr::binary(
            BinaryOp::Subtract,
            Expr::Literal(Value::Number(1.0)),
            Expr::binary(
                BinaryOp::Subtract,
                Expr::Literal(Value::Number(2.0)),
                Expr::Literal(Value::Number(3.0)),
            ),
        );
        assert_eq!(serialize_condition(&expr), "1 - (2 - 3)");
    }

    #[test]
    fn negative_literal_is_wrapped() {
        let expr = Expr::Literal(Value::Number(-4.5));
        assert_eq!(serialize_condition(&expr), "(-4.5)");
    }

    #[test]
    fn keyword_named_variable_uses_brackets() {
        let expr = Expr::Variable("true".to_string());
        assert_eq!(serialize_condition(&expr), "[[true]]");
    }
}
