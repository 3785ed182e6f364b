use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// A value stored in a data context or produced by evaluating a condition.
///
/// The `Value` enum is the whole dynamic type system of the condition
/// language: numbers, strings and booleans. Coercions between them follow
/// fixed rules (see [`Value::to_number`] and [`Value::is_truthy`]).
///
/// # Example
///
/// ```
/// use rulegen::Value;
///
/// let count: Value = 42.into();
/// let name: Value = "Alice".into();
/// let flag: Value = true.into();
///
/// assert_eq!(count.to_number(), Some(42.0));
/// assert_eq!(name.to_number(), None);
/// assert!(flag.is_truthy());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean value.
    Boolean(bool),

    /// A number. All numbers are 64-bit floats.
    Number(f64),

    /// A text value.
    String(String),
}

impl Value {
    /// Coerce this value to a number.
    ///
    /// Numbers are returned as is, booleans become `1` or `0`, and strings
    /// are parsed as plain decimals (surrounding whitespace ignored, no
    /// exponent notation). Returns `None` for strings that are not numeric.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => parse_decimal(s),
        }
    }

    /// Coerce this value to a boolean.
    ///
    /// Nonzero numbers and non-empty strings are true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
        }
    }

    /// Get this value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
        }
    }
}

/// Parse a plain decimal number: optional sign, digits, optional fraction.
///
/// Rejects the extra forms `str::parse::<f64>` accepts (`inf`, `NaN`,
/// exponents) so that only text that reads as a number coerces to one.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let unsigned = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let valid = digits(whole)
        && fraction.is_none_or(|f| !f.is_empty() && digits(f))
        && !whole.is_empty();
    if valid { trimmed.parse().ok() } else { None }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            // Avoid printing "-0" for negative zero.
            Value::Number(n) if *n == 0.0 => write!(f, "0"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decimal_accepts_plain_numbers() {
        assert_eq!(parse_decimal("7"), Some(7.0));
        assert_eq!(parse_decimal(" -2.5 "), Some(-2.5));
        assert_eq!(parse_decimal("+3"), Some(3.0));
    }

    #[test]
    fn parse_decimal_rejects_other_forms() {
        for text in ["", "abc", "1e5", "inf", "NaN", "1.", ".5", "1.2.3", "-"] {
            assert_eq!(parse_decimal(text), None, "{text:?}");
        }
    }

    #[test]
    fn integral_numbers_display_without_fraction() {
        assert_eq!(Value::Number(14.0).to_string(), "14");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
    }
}
