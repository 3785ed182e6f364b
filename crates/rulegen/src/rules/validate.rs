//! Static validation of rule maps.
//!
//! Validation runs once, before any generation, and collects every problem
//! instead of stopping at the first:
//! - the root rule exists
//! - data keys and condition variables are in the allow-list
//! - conditions parse and date patterns are valid
//! - template references resolve, with typo suggestions when they do not
//! - no rule reachable from the root reaches itself

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, instrument};

use super::error::{ValidationError, compute_suggestions};
use super::model::{ConditionalRule, DataRule, Format, ROOT_RULE, Rule, RuleMap};
use crate::condition::parse_condition;
use crate::generator::transforms::is_valid_date_pattern;

/// The data keys a caller promises to provide at generation time.
pub type KnownKeys = BTreeSet<String>;

/// Check a rule map against the keys the caller promises to provide.
///
/// Problems are reported in a deterministic order: a missing root first,
/// then per-rule problems in rule name order, then cycles.
///
/// # Example
///
/// ```
/// use rulegen::{KnownKeys, RuleMap, ValidationError, validate_rules};
///
/// let rules = RuleMap::from_json_str(
///     r#"{ "": { "type": "conditional", "branches": [ { "output": "@" } ] } }"#,
/// )
/// .unwrap();
///
/// assert_eq!(validate_rules(&rules, &KnownKeys::new()), Ok(()));
/// assert_eq!(
///     validate_rules(&RuleMap::new(), &KnownKeys::new()),
///     Err(vec![ValidationError::MissingRoot])
/// );
/// ```
#[instrument(skip_all, fields(rules = rules.len(), keys = known_keys.len()))]
pub fn validate_rules(rules: &RuleMap, known_keys: &KnownKeys) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if rules.root().is_none() {
        errors.push(ValidationError::MissingRoot);
    }

    for (name, rule) in rules.iter() {
        match rule {
            Rule::Data(data) => check_data_rule(name, data, known_keys, &mut errors),
            Rule::Conditional(conditional) => {
                check_conditional_rule(name, conditional, rules, known_keys, &mut errors);
            }
        }
    }

    if rules.root().is_some() {
        errors.extend(find_cycles(rules));
    }

    debug!(errors = errors.len(), "validation finished");
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_data_rule(
    name: &str,
    rule: &DataRule,
    known_keys: &KnownKeys,
    errors: &mut Vec<ValidationError>,
) {
    if !known_keys.contains(&rule.key) {
        errors.push(ValidationError::MissingDataKey {
            rule: name.to_string(),
            branch: None,
            key: rule.key.clone(),
            suggestions: compute_suggestions(&rule.key, known_keys.iter().map(String::as_str)),
        });
    }

    if let Some(Format::Date { pattern }) = &rule.format
        && !is_valid_date_pattern(pattern)
    {
        errors.push(ValidationError::InvalidFormat {
            rule: name.to_string(),
            pattern: pattern.clone(),
        });
    }
}

fn check_conditional_rule(
    name: &str,
    rule: &ConditionalRule,
    rules: &RuleMap,
    known_keys: &KnownKeys,
    errors: &mut Vec<ValidationError>,
) {
    for (index, branch) in rule.branches.iter().enumerate() {
        if let Some(source) = &branch.condition {
            match parse_condition(source) {
                Ok(expr) => {
                    for variable in expr.variables() {
                        if !known_keys.contains(variable) {
                            errors.push(ValidationError::MissingDataKey {
                                rule: name.to_string(),
                                branch: Some(index),
                                key: variable.to_string(),
                                suggestions: compute_suggestions(
                                    variable,
                                    known_keys.iter().map(String::as_str),
                                ),
                            });
                        }
                    }
                }
                Err(source) => errors.push(ValidationError::InvalidCondition {
                    rule: name.to_string(),
                    branch: index,
                    source,
                }),
            }
        }

        let mut reported = BTreeSet::new();
        for reference in branch.output.references() {
            if !rules.contains(reference) && reported.insert(reference) {
                errors.push(ValidationError::UnknownRuleReference {
                    rule: name.to_string(),
                    branch: index,
                    reference: reference.to_string(),
                    suggestions: compute_suggestions(
                        reference,
                        rules.names().filter(|n| !n.is_empty()),
                    ),
                });
            }
        }
    }
}

/// Color for three-color DFS cycle detection.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not yet visited.
    White,
    /// Currently on the DFS stack.
    Gray,
    /// Fully processed.
    Black,
}

/// A rule on the DFS stack and the next of its references to visit.
struct Frame<'a> {
    name: &'a str,
    references: Vec<&'a str>,
    next: usize,
}

/// Find every cycle reachable from the root.
///
/// Each reference to a rule that is still on the DFS stack is reported as
/// the chain from that rule back to itself, e.g. `a -> b -> a`. The walk
/// keeps its own stack, so long reference chains cannot exhaust the call
/// stack.
fn find_cycles(rules: &RuleMap) -> Vec<ValidationError> {
    let mut colors: BTreeMap<&str, Color> = rules.names().map(|name| (name, Color::White)).collect();
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut cycles = Vec::new();
    stack.extend(enter(ROOT_RULE, rules, &mut colors));

    while let Some(frame) = stack.last_mut() {
        if let Some(reference) = frame.references.get(frame.next).copied() {
            frame.next += 1;
            visit(reference, rules, &mut colors, &mut stack, &mut cycles);
        } else {
            colors.insert(frame.name, Color::Black);
            stack.pop();
        }
    }
    cycles
}

fn visit<'a>(
    reference: &'a str,
    rules: &'a RuleMap,
    colors: &mut BTreeMap<&'a str, Color>,
    stack: &mut Vec<Frame<'a>>,
    cycles: &mut Vec<ValidationError>,
) {
    match colors.get(reference).copied() {
        Some(Color::Gray) => {
            let start = stack.iter().position(|f| f.name == reference).unwrap_or(0);
            let mut chain: Vec<String> = stack[start..].iter().map(|f| f.name.to_string()).collect();
            chain.push(reference.to_string());
            cycles.push(ValidationError::CycleDetected { chain });
        }
        Some(Color::White) => stack.extend(enter(reference, rules, colors)),
        // Black rules are finished; unknown references are reported
        // separately.
        Some(Color::Black) | None => {}
    }
}

/// Mark a rule as in progress and build its stack frame.
fn enter<'a>(
    name: &'a str,
    rules: &'a RuleMap,
    colors: &mut BTreeMap<&'a str, Color>,
) -> Option<Frame<'a>> {
    let rule = rules.get(name)?;
    colors.insert(name, Color::Gray);
    Some(Frame {
        name,
        references: rule.references(),
        next: 0,
    })
}
