//! Case transforms and value formats for data rules.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use icu_casemap::CaseMapper;
use icu_locale_core::langid;
use unicode_segmentation::UnicodeSegmentation;

use super::error::FormatError;
use crate::rules::{Case, Format};
use crate::types::parse_decimal;

/// Apply a case transform to text.
///
/// `First` uppercases only the first grapheme and leaves the rest alone.
pub fn apply_case(text: &str, case: Case) -> String {
    let mapper = CaseMapper::new();
    let root = langid!("und");
    match case {
        Case::Unchanged => text.to_string(),
        Case::Upper => mapper.uppercase_to_string(text, &root).to_string(),
        Case::Lower => mapper.lowercase_to_string(text, &root).to_string(),
        Case::First => {
            let mut graphemes = text.graphemes(true);
            match graphemes.next() {
                Some(first) => {
                    let mut result = mapper.uppercase_to_string(first, &root).to_string();
                    result.push_str(graphemes.as_str());
                    result
                }
                None => String::new(),
            }
        }
    }
}

/// Apply a format to text that has already been case transformed.
pub fn apply_format(text: &str, format: &Format) -> Result<String, FormatError> {
    match format {
        Format::Date { pattern } => format_date(text, pattern),
        Format::Number {
            decimals,
            decimal_point,
            thousands_separator,
        } => {
            let number = parse_decimal(text).ok_or_else(|| FormatError::NotANumber {
                value: text.to_string(),
            })?;
            Ok(format_number(
                number,
                *decimals,
                decimal_point,
                thousands_separator,
            ))
        }
    }
}

/// Whether `pattern` is a strftime pattern chrono understands.
pub fn is_valid_date_pattern(pattern: &str) -> bool {
    StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}

fn format_date(text: &str, pattern: &str) -> Result<String, FormatError> {
    if !is_valid_date_pattern(pattern) {
        return Err(FormatError::InvalidPattern {
            pattern: pattern.to_string(),
        });
    }
    let date = parse_date(text).ok_or_else(|| FormatError::InvalidDate {
        value: text.to_string(),
    })?;

    let mut rendered = String::new();
    write!(rendered, "{}", date.format_with_items(StrftimeItems::new(pattern))).map_err(
        |_| FormatError::InvalidPattern {
            pattern: pattern.to_string(),
        },
    )?;
    Ok(rendered)
}

/// Interpret text as a date.
///
/// Accepted forms, tried in order:
/// - a decimal number of seconds since the Unix epoch
/// - RFC 3339, e.g. `2024-03-01T09:30:00+01:00`
/// - `YYYY-MM-DD HH:MM:SS`, taken as UTC
/// - `YYYY-MM-DD`, midnight UTC
fn parse_date(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Some(seconds) = parse_decimal(text) {
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9) as u32;
        return DateTime::from_timestamp(whole as i64, nanos).map(|d| d.fixed_offset());
    }

    // A lowercase transform may have touched the `T` and `Z` markers.
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_rfc3339(&text.to_uppercase()))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|d| d.and_utc().fixed_offset())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN).and_utc().fixed_offset())
        })
}

/// Render a number with fixed decimals and grouped integer digits.
fn format_number(number: f64, decimals: usize, decimal_point: &str, separator: &str) -> String {
    let fixed = format!("{:.*}", decimals, number.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut result = String::new();
    if number < 0.0 && fixed.chars().any(|c| matches!(c, '1'..='9')) {
        result.push('-');
    }
    let digits = integer.len();
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            result.push_str(separator);
        }
        result.push(digit);
    }
    if let Some(fraction) = fraction {
        result.push_str(decimal_point);
        result.push_str(fraction);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_changes_only_the_first_character() {
        assert_eq!(apply_case("élan vital", Case::First), "Élan vital");
        assert_eq!(apply_case("mIXed", Case::First), "MIXed");
        assert_eq!(apply_case("", Case::First), "");
    }

    #[test]
    fn number_grouping() {
        assert_eq!(format_number(1234567.891, 2, ".", ","), "1,234,567.89");
        assert_eq!(format_number(-999.0, 0, ".", ","), "-999");
        assert_eq!(format_number(-0.001, 1, ",", "."), "0,0");
        assert_eq!(format_number(1000.5, 1, ",", " "), "1 000,5");
    }

    #[test]
    fn dates_from_each_accepted_form() {
        let pattern = "%Y-%m-%d %H:%M";
        assert_eq!(format_date("0", pattern).unwrap(), "1970-01-01 00:00");
        assert_eq!(
            format_date("2024-03-01t09:30:00z", pattern).unwrap(),
            "2024-03-01 09:30"
        );
        assert_eq!(
            format_date("2024-03-01 09:30:15", pattern).unwrap(),
            "2024-03-01 09:30"
        );
        assert_eq!(format_date("2024-03-01", pattern).unwrap(), "2024-03-01 00:00");
    }

    #[test]
    fn bad_dates_and_patterns() {
        assert_eq!(
            format_date("soon", "%Y"),
            Err(FormatError::InvalidDate {
                value: "soon".to_string()
            })
        );
        assert!(!is_valid_date_pattern("%Q"));
        assert!(is_valid_date_pattern("%B %-d, %Y"));
    }
}
