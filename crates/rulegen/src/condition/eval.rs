//! Expression evaluation against a data context.
//!
//! Coercion rules:
//! - Arithmetic coerces both operands to numbers; there is no string
//!   concatenation. `/` and `%` by zero fail.
//! - `==`/`!=` compare numbers numerically and strings textually. A number
//!   against a string coerces the string, and a non-numeric string is simply
//!   unequal. A boolean on either side compares truthiness.
//! - Relational operators require numeric operands.
//! - `&&`/`||` short-circuit over truthiness and yield booleans.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::error::EvalError;
use crate::types::{DataContext, Value, parse_decimal};

/// Evaluate an expression to its raw typed value.
pub fn evaluate(expr: &Expr, data: &DataContext) -> Result<Value, EvalError> {
    Evaluator::new(data).evaluate(expr)
}

/// Evaluate an expression and coerce the result to a boolean, as done for
/// branch conditions.
///
/// # Example
///
/// ```
/// use rulegen::{DataContext, evaluate_condition, parse_condition};
///
/// let data: DataContext = [("x", "7")].into_iter().collect();
/// let expr = parse_condition("x == 7").unwrap();
/// assert!(evaluate_condition(&expr, &data).unwrap());
/// ```
pub fn evaluate_condition(expr: &Expr, data: &DataContext) -> Result<bool, EvalError> {
    evaluate(expr, data).map(|value| value.is_truthy())
}

/// Evaluate a condition, also returning the data keys it actually read.
///
/// Variables skipped by short-circuiting are not read.
pub(crate) fn evaluate_condition_tracked(
    expr: &Expr,
    data: &DataContext,
) -> Result<(bool, BTreeSet<String>), EvalError> {
    let mut evaluator = Evaluator::new(data);
    let value = evaluator.evaluate(expr)?;
    Ok((value.is_truthy(), evaluator.reads))
}

struct Evaluator<'a> {
    data: &'a DataContext,
    reads: BTreeSet<String>,
}

impl<'a> Evaluator<'a> {
    fn new(data: &'a DataContext) -> Self {
        Self {
            data,
            reads: BTreeSet::new(),
        }
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Variable(name) => {
                let value = self
                    .data
                    .get(name)
                    .ok_or_else(|| EvalError::UndefinedVariable { name: name.clone() })?;
                if !self.reads.contains(name) {
                    self.reads.insert(name.clone());
                }
                Ok(value.clone())
            }
            Expr::Unary { op, operand } => {
                let value = self.evaluate(operand)?;
                match op {
                    UnaryOp::Not => Ok(Value::Boolean(!value.is_truthy())),
                    UnaryOp::Negate => Ok(Value::Number(-number_operand(op.symbol(), &value)?)),
                }
            }
            Expr::Binary { op, left, right } => self.binary(*op, left, right),
        }
    }

    fn binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Value, EvalError> {
        match op {
            // The right side is only evaluated when the left does not decide
            // the result.
            BinaryOp::And => {
                let result = self.evaluate(left)?.is_truthy() && self.evaluate(right)?.is_truthy();
                Ok(Value::Boolean(result))
            }
            BinaryOp::Or => {
                let result = self.evaluate(left)?.is_truthy() || self.evaluate(right)?.is_truthy();
                Ok(Value::Boolean(result))
            }
            BinaryOp::Equal | BinaryOp::NotEqual => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                let equal = loosely_equal(&left, &right);
                Ok(Value::Boolean(equal == (op == BinaryOp::Equal)))
            }
            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
                let (a, b) = self.numeric_operands(op, left, right)?;
                let ordering = a.partial_cmp(&b);
                let result = match op {
                    BinaryOp::Less => ordering == Some(Ordering::Less),
                    BinaryOp::LessEqual => {
                        matches!(ordering, Some(Ordering::Less | Ordering::Equal))
                    }
                    BinaryOp::Greater => ordering == Some(Ordering::Greater),
                    _ => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
                };
                Ok(Value::Boolean(result))
            }
            BinaryOp::Add
            | BinaryOp::Subtract
            | BinaryOp::Multiply
            | BinaryOp::Divide
            | BinaryOp::Remainder => {
                let (a, b) = self.numeric_operands(op, left, right)?;
                let result = match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Subtract => a - b,
                    BinaryOp::Multiply => a * b,
                    BinaryOp::Divide | BinaryOp::Remainder if b == 0.0 => {
                        return Err(EvalError::DivisionByZero { operator: op });
                    }
                    BinaryOp::Divide => a / b,
                    _ => a % b,
                };
                Ok(Value::Number(result))
            }
        }
    }

    /// Evaluate both operands, left first, and coerce them to numbers.
    fn numeric_operands(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
    ) -> Result<(f64, f64), EvalError> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;
        Ok((
            number_operand(op.symbol(), &left)?,
            number_operand(op.symbol(), &right)?,
        ))
    }
}

/// Equality with the number/string coercion described in the module docs.
fn loosely_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Boolean(b), other) | (other, Value::Boolean(b)) => *b == other.is_truthy(),
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            parse_decimal(s).is_some_and(|parsed| parsed == *n)
        }
    }
}

fn number_operand(operator: &'static str, value: &Value) -> Result<f64, EvalError> {
    value.to_number().ok_or_else(|| EvalError::TypeMismatch {
        operator,
        found: match value {
            Value::String(s) => format!("string '{s}'"),
            other => format!("{} {other}", other.type_name()),
        },
    })
}
