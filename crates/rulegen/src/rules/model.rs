//! Rule map types.
//!
//! A rule map is a set of named rules. The rule named `""` is the root,
//! where generation starts. Rules are either data lookups or conditional
//! rules whose branches select output templates.

use std::collections::BTreeMap;
use std::collections::btree_map::Iter;

use bon::Builder;
use serde::{Deserialize, Serialize};

use super::template::Template;

/// Name of the root rule.
pub const ROOT_RULE: &str = "";

/// A named unit of the generation graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    /// Emits a value from the data context.
    Data(DataRule),
    /// Chooses among branches by evaluating their conditions.
    #[serde(alias = "if")]
    Conditional(ConditionalRule),
}

impl Rule {
    /// Rule names referenced from this rule's templates, first occurrence
    /// order, without repeats.
    pub fn references(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        if let Rule::Conditional(rule) = self {
            for name in rule.branches.iter().flat_map(|b| b.output.references()) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

impl From<DataRule> for Rule {
    fn from(rule: DataRule) -> Self {
        Rule::Data(rule)
    }
}

impl From<ConditionalRule> for Rule {
    fn from(rule: ConditionalRule) -> Self {
        Rule::Conditional(rule)
    }
}

/// A rule that emits a value from the data context.
///
/// The value is rendered as text, the case transform is applied, then the
/// optional format.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct DataRule {
    /// Key into the data context.
    #[builder(into)]
    pub key: String,

    #[builder(default)]
    #[serde(default)]
    pub case: Case,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
}

/// Case transform applied to a data value's text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Case {
    /// Leave the text alone.
    #[default]
    #[serde(rename = "none")]
    Unchanged,
    /// Uppercase the whole text.
    Upper,
    /// Lowercase the whole text.
    Lower,
    /// Uppercase only the first character.
    #[serde(alias = "first_upper")]
    First,
}

/// Formatting applied to a data value after its case transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Format {
    /// Reinterpret the value as a date and render it with a strftime
    /// pattern, e.g. `%B %-d, %Y`.
    Date { pattern: String },

    /// Render the value as a number with fixed decimals and digit grouping.
    Number {
        #[serde(default)]
        decimals: usize,
        #[serde(default = "default_decimal_point")]
        decimal_point: String,
        #[serde(default = "default_thousands_separator")]
        thousands_separator: String,
    },
}

fn default_decimal_point() -> String {
    ".".to_string()
}

fn default_thousands_separator() -> String {
    ",".to_string()
}

/// A rule that evaluates branch conditions and emits matched templates.
///
/// Branches are evaluated in order (or in a fresh random order per call
/// when `randomize` is set). Evaluation stops once `matches` branches have
/// matched; `0` means every satisfied branch is emitted.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct ConditionalRule {
    #[serde(alias = "rules")]
    pub branches: Vec<Branch>,

    #[builder(default = 1)]
    #[serde(default = "default_matches")]
    pub matches: usize,

    #[builder(default)]
    #[serde(default)]
    pub randomize: bool,
}

fn default_matches() -> usize {
    1
}

/// One alternative of a conditional rule.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct Branch {
    /// Condition source. `None` always matches.
    #[builder(into)]
    #[serde(
        rename = "if",
        alias = "cond",
        alias = "condition",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub condition: Option<String>,

    pub output: Template,
}

/// A mapping from rule name to rule, ordered by name.
///
/// # Example
///
/// ```
/// use rulegen::{Branch, ConditionalRule, DataRule, RuleMap, Template};
///
/// let mut rules = RuleMap::new();
/// rules.insert(
///     "",
///     ConditionalRule::builder()
///         .branches(vec![Branch::builder()
///             .output(Template::parse("Hi @name!").unwrap())
///             .build()])
///         .build(),
/// );
/// rules.insert("name", DataRule::builder().key("first name").build());
///
/// assert!(rules.root().is_some());
/// assert_eq!(rules.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleMap {
    rules: BTreeMap<String, Rule>,
}

impl RuleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a rule.
    pub fn insert(&mut self, name: impl Into<String>, rule: impl Into<Rule>) {
        self.rules.insert(name.into(), rule.into());
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// The root rule, if present.
    pub fn root(&self) -> Option<&Rule> {
        self.get(ROOT_RULE)
    }

    /// Rule names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_, String, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<K: Into<String>, R: Into<Rule>> FromIterator<(K, R)> for RuleMap {
    fn from_iter<T: IntoIterator<Item = (K, R)>>(iter: T) -> Self {
        Self {
            rules: iter
                .into_iter()
                .map(|(name, rule)| (name.into(), rule.into()))
                .collect(),
        }
    }
}

/// Name to show for a rule in messages; the root has an empty name.
pub fn display_name(name: &str) -> &str {
    if name.is_empty() { "<root>" } else { name }
}
