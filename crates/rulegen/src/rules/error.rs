//! Error types for rule maps.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;
use std::path::PathBuf;

use strsim::levenshtein;
use thiserror::Error;

use super::model::display_name;
use crate::condition::ConditionError;

/// Errors that occur while loading rule maps or data contexts.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O error when reading an input file.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed JSON, or JSON that does not describe a rule map or context.
    #[error("{origin}:{line}:{column}: {message}")]
    Parse {
        origin: String,
        line: usize,
        column: usize,
        message: String,
    },
}

/// A problem found by [`validate_rules`](crate::validate_rules).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// There is no rule named `""`.
    #[error("rule map has no root rule (a rule named \"\")")]
    MissingRoot,

    /// A data rule or condition reads a key the data context does not
    /// provide.
    #[error(
        "rule '{}'{}: data key '{key}' is not provided{}",
        display_name(rule),
        BranchLabel(*branch),
        DidYouMean(suggestions)
    )]
    MissingDataKey {
        rule: String,
        branch: Option<usize>,
        key: String,
        suggestions: Vec<String>,
    },

    /// A template references a rule that does not exist.
    #[error(
        "rule '{}' branch {branch}: unknown rule '{reference}'{}",
        display_name(rule),
        DidYouMean(suggestions)
    )]
    UnknownRuleReference {
        rule: String,
        branch: usize,
        reference: String,
        suggestions: Vec<String>,
    },

    /// A rule reaches itself through template references.
    #[error("cycle detected: {}", chain.iter().map(String::as_str).map(display_name).collect::<Vec<_>>().join(" -> "))]
    CycleDetected { chain: Vec<String> },

    /// A branch condition does not lex or parse.
    #[error("rule '{}' branch {branch}: invalid condition: {source}", display_name(rule))]
    InvalidCondition {
        rule: String,
        branch: usize,
        #[source]
        source: ConditionError,
    },

    /// A data rule's date pattern is not a valid strftime pattern.
    #[error("rule '{}': invalid date pattern '{pattern}'", display_name(rule))]
    InvalidFormat { rule: String, pattern: String },
}

impl ValidationError {
    /// Name of the rule the problem belongs to, if it belongs to one.
    pub fn rule(&self) -> Option<&str> {
        match self {
            ValidationError::MissingRoot | ValidationError::CycleDetected { .. } => None,
            ValidationError::MissingDataKey { rule, .. }
            | ValidationError::UnknownRuleReference { rule, .. }
            | ValidationError::InvalidCondition { rule, .. }
            | ValidationError::InvalidFormat { rule, .. } => Some(rule),
        }
    }
}

/// A non-fatal finding reported by [`lint_rules`](crate::lint_rules).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleWarning {
    /// The rule is never reachable from the root.
    #[error("rule '{name}' is not reachable from the root rule")]
    UnreachableRule { name: String },

    /// A branch can never be evaluated because earlier unconditional
    /// branches always use up the `matches` limit.
    #[error("rule '{}' branch {branch} is shadowed by earlier unconditional branches", display_name(rule))]
    ShadowedBranch { rule: String, branch: usize },

    /// `matches` asks for more branches than the rule has.
    #[error(
        "rule '{}' asks for {matches} matches but has only {branches} branch(es)",
        display_name(rule)
    )]
    MatchesExceedBranches {
        rule: String,
        matches: usize,
        branches: usize,
    },
}

/// Formats `" branch N"` for branch-level problems.
struct BranchLabel(Option<usize>);

impl Display for BranchLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.0 {
            Some(branch) => write!(f, " branch {branch}"),
            None => Ok(()),
        }
    }
}

/// Formats a "did you mean" hint when suggestions exist.
struct DidYouMean<'a>(&'a [String]);

impl Display for DidYouMean<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.0 {
            [] => Ok(()),
            [only] => write!(f, " (did you mean '{only}'?)"),
            many => write!(f, " (did you mean one of: {}?)", many.join(", ")),
        }
    }
}

/// Compute typo suggestions using Levenshtein distance.
///
/// - distance <= 1 for names of 3 characters or fewer
/// - distance <= 2 for longer names
/// - at most 3 suggestions, closest first
pub fn compute_suggestions<'a>(
    name: &str,
    available: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let max_distance = if name.chars().count() <= 3 { 1 } else { 2 };
    let mut suggestions: Vec<(usize, String)> = available
        .into_iter()
        .filter_map(|candidate| {
            let dist = levenshtein(name, candidate);
            if dist <= max_distance && dist > 0 {
                Some((dist, candidate.to_string()))
            } else {
                None
            }
        })
        .collect();

    suggestions.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    suggestions.into_iter().take(3).map(|(_, s)| s).collect()
}
