//! Loading rule maps and data contexts from JSON.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::error::LoadError;
use super::model::RuleMap;
use crate::types::DataContext;

/// Name used in parse errors for text that did not come from a file.
const INLINE_ORIGIN: &str = "<input>";

/// Load a rule map from a JSON file.
pub fn load_rules(path: impl AsRef<Path>) -> Result<RuleMap, LoadError> {
    load_json(path.as_ref())
}

/// Load a data context from a JSON file holding a flat object.
pub fn load_context(path: impl AsRef<Path>) -> Result<DataContext, LoadError> {
    load_json(path.as_ref())
}

impl RuleMap {
    /// Parse a rule map from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        parse_json(json, INLINE_ORIGIN)
    }
}

impl DataContext {
    /// Parse a data context from JSON text.
    ///
    /// ```
    /// use rulegen::{DataContext, Value};
    ///
    /// let data = DataContext::from_json_str(r#"{"x": "7", "adult": true}"#).unwrap();
    /// assert_eq!(data.get("adult"), Some(&Value::Boolean(true)));
    /// assert!(DataContext::from_json_str(r#"{"x": [1]}"#).is_err());
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        parse_json(json, INLINE_ORIGIN)
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_json(&content, &path.display().to_string())
}

fn parse_json<T: DeserializeOwned>(json: &str, origin: &str) -> Result<T, LoadError> {
    serde_json::from_str(json).map_err(|e| LoadError::Parse {
        origin: origin.to_string(),
        line: e.line(),
        column: e.column(),
        message: strip_position(&e.to_string()),
    })
}

/// serde_json appends " at line L column C" to its messages; the position
/// is reported separately.
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(index) => message[..index].to_string(),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_carry_position() {
        let err = RuleMap::from_json_str("{\n  \"\": 3,\n}").unwrap_err();
        let LoadError::Parse { origin, line, .. } = err else {
            panic!("expected parse error");
        };
        assert_eq!(origin, "<input>");
        assert_eq!(line, 2);
    }

    #[test]
    fn position_suffix_is_stripped() {
        assert_eq!(strip_position("expected value at line 1 column 2"), "expected value");
        assert_eq!(strip_position("EOF"), "EOF");
    }
}
