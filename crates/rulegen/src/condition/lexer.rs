//! Condition tokenizer using winnow.
//!
//! Produces a flat token list ending in [`TokenKind::Eof`]. Handles:
//! - Decimal numbers (no sign, no exponent)
//! - Single-quoted strings with `\'` as the only escape
//! - Variables written `[[any text]]` or as bare identifiers
//! - `true` / `false` keywords
//! - One- and two-character operators, two-character forms first

use winnow::combinator::{alt, delimited, opt, repeat};
use winnow::prelude::*;
use winnow::token::{none_of, one_of, take_until, take_while};

use super::error::LexError;

/// A token with the byte offset where it starts in the condition source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// The lexical category of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    String(String),
    Boolean(bool),
    Variable(String),
    Operator(Operator),
    Eof,
}

/// Operator and punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    AndAnd,
    OrOr,
    Bang,
    LeftParen,
    RightParen,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
            Operator::Percent => "%",
            Operator::EqualEqual => "==",
            Operator::BangEqual => "!=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::AndAnd => "&&",
            Operator::OrOr => "||",
            Operator::Bang => "!",
            Operator::LeftParen => "(",
            Operator::RightParen => ")",
        }
    }
}

/// Split a condition string into tokens.
///
/// The returned list always ends with a single [`TokenKind::Eof`] token
/// whose offset is the length of the input.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut remaining = input;
    loop {
        remaining = remaining.trim_start_matches(|c: char| c.is_ascii_whitespace());
        let offset = input.len() - remaining.len();
        if remaining.is_empty() {
            tokens.push(Token {
                kind: TokenKind::Eof,
                offset,
            });
            return Ok(tokens);
        }

        let mut rest = remaining;
        match token_kind(&mut rest) {
            Ok(kind) => {
                tokens.push(Token { kind, offset });
                remaining = rest;
            }
            Err(_) => return Err(classify_failure(remaining, offset)),
        }
    }
}

/// Work out which lexical error applies at a position no token matched.
fn classify_failure(remaining: &str, offset: usize) -> LexError {
    if remaining.starts_with('\'') {
        LexError::UnterminatedString { offset }
    } else if remaining.starts_with("[[") {
        LexError::UnterminatedVariable { offset }
    } else {
        LexError::UnexpectedCharacter {
            offset,
            found: remaining.chars().next().unwrap_or('?'),
        }
    }
}

/// Parse optional whitespace.
fn token_kind(input: &mut &str) -> ModalResult<TokenKind> {
    alt((
        number,
        string_literal,
        bracketed_variable,
        word,
        operator.map(TokenKind::Operator),
    ))
    .parse_next(input)
}

/// Parse a decimal number: digits with an optional `.digits` fraction.
fn number(input: &mut &str) -> ModalResult<TokenKind> {
    (digits, opt(('.', digits)))
        .take()
        .try_map(str::parse::<f64>)
        .map(TokenKind::Number)
        .parse_next(input)
}

fn digits<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)
}

/// Parse a single-quoted string. `\'` is an embedded quote; any other
/// backslash is kept literally.
fn string_literal(input: &mut &str) -> ModalResult<TokenKind> {
    delimited('\'', string_body, '\'')
        .map(TokenKind::String)
        .parse_next(input)
}

fn string_body(input: &mut &str) -> ModalResult<String> {
    repeat(0.., alt(("\\'".value('\''), none_of('\''))))
        .fold(String::new, |mut text, c| {
            text.push(c);
            text
        })
        .parse_next(input)
}

/// Parse `[[name]]`. The interior is taken literally, spaces included.
fn bracketed_variable(input: &mut &str) -> ModalResult<TokenKind> {
    delimited("[[", take_until(0.., "]]"), "]]")
        .map(|name: &str| TokenKind::Variable(name.to_string()))
        .parse_next(input)
}

/// Parse an identifier, which is either a keyword or a bare variable.
fn word(input: &mut &str) -> ModalResult<TokenKind> {
    (one_of(is_ident_start), take_while(0.., is_ident_cont))
        .take()
        .map(|word: &str| match word {
            "true" => TokenKind::Boolean(true),
            "false" => TokenKind::Boolean(false),
            name => TokenKind::Variable(name.to_string()),
        })
        .parse_next(input)
}

fn operator(input: &mut &str) -> ModalResult<Operator> {
    alt((
        alt((
            "==".value(Operator::EqualEqual),
            "!=".value(Operator::BangEqual),
            "<=".value(Operator::LessEqual),
            ">=".value(Operator::GreaterEqual),
            "&&".value(Operator::AndAnd),
            "||".value(Operator::OrOr),
        )),
        alt((
            '+'.value(Operator::Plus),
            '-'.value(Operator::Minus),
            '*'.value(Operator::Star),
            '/'.value(Operator::Slash),
            '%'.value(Operator::Percent),
            '<'.value(Operator::Less),
            '>'.value(Operator::Greater),
            '!'.value(Operator::Bang),
            '('.value(Operator::LeftParen),
            ')'.value(Operator::RightParen),
        )),
    ))
    .parse_next(input)
}

/// Check if a character can start an identifier.
pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier.
pub(crate) fn is_ident_cont(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
