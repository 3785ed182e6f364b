//! Recursive-descent parser from tokens to an expression tree.
//!
//! Precedence, lowest first: `||`, `&&`, `== !=`, `< <= > >=`, `+ -`,
//! `* / %`, then unary `! -`, then primary expressions. Every binary level
//! is left-associative.

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::error::{ConditionError, ParseError};
use super::lexer::{Operator, Token, TokenKind, tokenize};
use crate::types::Value;

/// Deepest expression tree, and deepest parenthesis or unary nesting, a
/// condition may have.
pub const MAX_NESTING: usize = 128;

/// Binary operators grouped by precedence level, lowest first.
const LEVELS: [&[(Operator, BinaryOp)]; 6] = [
    &[(Operator::OrOr, BinaryOp::Or)],
    &[(Operator::AndAnd, BinaryOp::And)],
    &[
        (Operator::EqualEqual, BinaryOp::Equal),
        (Operator::BangEqual, BinaryOp::NotEqual),
    ],
    &[
        (Operator::Less, BinaryOp::Less),
        (Operator::LessEqual, BinaryOp::LessEqual),
        (Operator::Greater, BinaryOp::Greater),
        (Operator::GreaterEqual, BinaryOp::GreaterEqual),
    ],
    &[
        (Operator::Plus, BinaryOp::Add),
        (Operator::Minus, BinaryOp::Subtract),
    ],
    &[
        (Operator::Star, BinaryOp::Multiply),
        (Operator::Slash, BinaryOp::Divide),
        (Operator::Percent, BinaryOp::Remainder),
    ],
];

/// Parse a condition string into an expression tree.
///
/// # Example
///
/// ```
/// use rulegen::{DataContext, evaluate_condition, parse_condition};
///
/// let expr = parse_condition("2 + 3 * 4 < 20").unwrap();
/// assert!(evaluate_condition(&expr, &DataContext::new()).unwrap());
/// ```
pub fn parse_condition(input: &str) -> Result<Expr, ConditionError> {
    let tokens = tokenize(input)?;
    Ok(parse_tokens(&tokens)?)
}

/// Parse an already tokenized condition. `tokens` must end with
/// [`TokenKind::Eof`], as produced by [`tokenize`].
pub fn parse_tokens(tokens: &[Token]) -> Result<Expr, ParseError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        nesting: 0,
    };
    if matches!(parser.peek().kind, TokenKind::Eof) {
        return Err(parser.error("empty condition"));
    }
    let (expr, _) = parser.binary(0)?;
    match &parser.peek().kind {
        TokenKind::Eof => Ok(expr),
        TokenKind::Operator(Operator::RightParen) => Err(parser.error("unmatched ')'")),
        _ => Err(parser.error(format!(
            "expected an operator, found {}",
            describe(parser.peek())
        ))),
    }
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    /// Open parentheses and unary operators around the current token.
    nesting: usize,
}

/// A parsed subexpression and the height of its tree.
type Parsed = (Expr, usize);

impl Parser<'_> {
    fn peek(&self) -> &Token {
        // The lexer always terminates the list with Eof, and `advance`
        // never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if !matches!(self.tokens[index].kind, TokenKind::Eof) {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            position: self.pos,
            offset: self.peek().offset,
        }
    }

    fn too_deep(&self) -> ParseError {
        self.error("condition nested too deeply")
    }

    /// Step into a parenthesis or unary operator.
    fn enter(&mut self) -> Result<(), ParseError> {
        if self.nesting >= MAX_NESTING {
            return Err(self.too_deep());
        }
        self.nesting += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    /// Height of a node over children of height `child`.
    fn node_height(&self, child: usize) -> Result<usize, ParseError> {
        if child >= MAX_NESTING {
            return Err(self.too_deep());
        }
        Ok(child + 1)
    }

    /// Parse one left-associative binary level, descending into tighter
    /// levels for the operands.
    fn binary(&mut self, level: usize) -> Result<Parsed, ParseError> {
        let Some(operators) = LEVELS.get(level) else {
            return self.unary();
        };
        let (mut left, mut height) = self.binary(level + 1)?;
        while let Some(op) = self.match_binary(operators) {
            let (right, right_height) = self.binary(level + 1)?;
            height = self.node_height(height.max(right_height))?;
            left = Expr::binary(op, left, right);
        }
        Ok((left, height))
    }

    fn match_binary(&mut self, operators: &[(Operator, BinaryOp)]) -> Option<BinaryOp> {
        let TokenKind::Operator(found) = self.peek().kind else {
            return None;
        };
        let (_, op) = operators.iter().find(|(token, _)| *token == found)?;
        self.advance();
        Some(*op)
    }

    fn unary(&mut self) -> Result<Parsed, ParseError> {
        let op = match self.peek().kind {
            TokenKind::Operator(Operator::Bang) => UnaryOp::Not,
            TokenKind::Operator(Operator::Minus) => UnaryOp::Negate,
            _ => return self.primary(),
        };
        self.enter()?;
        self.advance();
        let (operand, height) = self.unary()?;
        self.leave();
        Ok((Expr::unary(op, operand), self.node_height(height)?))
    }

    fn primary(&mut self) -> Result<Parsed, ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number(n) => {
                self.advance();
                Ok((Expr::Literal(Value::Number(n)), 1))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok((Expr::Literal(Value::String(s)), 1))
            }
            TokenKind::Boolean(b) => {
                self.advance();
                Ok((Expr::Literal(Value::Boolean(b)), 1))
            }
            TokenKind::Variable(name) => {
                self.advance();
                Ok((Expr::Variable(name), 1))
            }
            TokenKind::Operator(Operator::LeftParen) => {
                self.enter()?;
                self.advance();
                let inner = self.binary(0)?;
                self.leave();
                if matches!(self.peek().kind, TokenKind::Operator(Operator::RightParen)) {
                    self.advance();
                    Ok(inner)
                } else {
                    Err(self.error(format!(
                        "expected ')' to close '(' at offset {}, found {}",
                        token.offset,
                        describe(self.peek())
                    )))
                }
            }
            TokenKind::Operator(Operator::RightParen) => Err(self.error("unmatched ')'")),
            TokenKind::Operator(op) => Err(self.error(format!(
                "expected an operand, found operator '{}'",
                op.symbol()
            ))),
            TokenKind::Eof => Err(self.error("unexpected end of input")),
        }
    }
}

/// Describe a token for error messages.
fn describe(token: &Token) -> String {
    match &token.kind {
        TokenKind::Number(n) => format!("number {}", Value::Number(*n)),
        TokenKind::String(s) => format!("string '{s}'"),
        TokenKind::Boolean(b) => format!("'{b}'"),
        TokenKind::Variable(name) => format!("variable '{name}'"),
        TokenKind::Operator(op) => format!("operator '{}'", op.symbol()),
        TokenKind::Eof => "end of input".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::Variable(name.to_string())
    }

    fn num(n: f64) -> Expr {
        Expr::Literal(Value::Number(n))
    }

    #[test]
    fn subtraction_is_left_associative() {
        let expr = parse_condition("a - b - c").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOp::Subtract,
                Expr::binary(BinaryOp::Subtract, var("a"), var("b")),
                var("c"),
            )
        );
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let expr = parse_condition("2 + 3 * 4").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOp::Add,
                num(2.0),
                Expr::binary(BinaryOp::Multiply, num(3.0), num(4.0)),
            )
        );
    }

    #[test]
    fn unary_binds_tighter_than_equality() {
        let expr = parse_condition("!a == b").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOp::Equal,
                Expr::unary(UnaryOp::Not, var("a")),
                var("b"),
            )
        );
    }

    #[test]
    fn nesting_limit() {
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert!(parse_condition(&nested(MAX_NESTING)).is_ok());

        let Err(ConditionError::Parse(err)) = parse_condition(&nested(2000)) else {
            panic!("expected parse error");
        };
        assert_eq!(err.message, "condition nested too deeply");
        assert_eq!(err.position, MAX_NESTING);

        let Err(ConditionError::Parse(err)) = parse_condition(&format!("{}x", "!".repeat(5000)))
        else {
            panic!("expected parse error");
        };
        assert_eq!(err.message, "condition nested too deeply");
    }

    #[test]
    fn long_operator_chains_are_bounded() {
        let chain = |terms: usize| vec!["1"; terms].join(" + ");
        assert!(parse_condition(&chain(MAX_NESTING)).is_ok());
        assert!(parse_condition(&chain(10_000)).is_err());
    }

    #[test]
    fn error_position_points_at_offending_token() {
        let Err(ConditionError::Parse(err)) = parse_condition("1 + * 2") else {
            panic!("expected parse error");
        };
        assert_eq!(err.position, 2);
        assert_eq!(err.offset, 4);
    }
}
