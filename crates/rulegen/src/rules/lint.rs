//! Lint rules for rule maps.
//!
//! Lints report structures that are valid but probably not what the author
//! meant. They never fail validation.

use std::collections::BTreeSet;

use super::error::RuleWarning;
use super::model::{ConditionalRule, ROOT_RULE, Rule, RuleMap};

/// Run all lints on a rule map.
///
/// Returns warnings in rule name order, unreachable rules first.
pub fn lint_rules(rules: &RuleMap) -> Vec<RuleWarning> {
    let mut warnings = Vec::new();

    if rules.root().is_some() {
        let reachable = reachable_rules(rules);
        warnings.extend(
            rules
                .names()
                .filter(|name| !reachable.contains(name))
                .map(|name| RuleWarning::UnreachableRule {
                    name: name.to_string(),
                }),
        );
    }

    for (name, rule) in rules.iter() {
        if let Rule::Conditional(conditional) = rule {
            check_matches(name, conditional, &mut warnings);
            check_shadowed(name, conditional, &mut warnings);
        }
    }

    warnings
}

/// Names of every rule reachable from the root through template
/// references, the root included.
pub fn reachable_rules(rules: &RuleMap) -> BTreeSet<&str> {
    let mut seen = BTreeSet::new();
    let mut pending = vec![ROOT_RULE];

    while let Some(name) = pending.pop() {
        let Some(rule) = rules.get(name) else {
            continue;
        };
        if !seen.insert(name) {
            continue;
        }
        pending.extend(rule.references().into_iter().filter(|r| !seen.contains(r)));
    }

    seen
}

fn check_matches(name: &str, rule: &ConditionalRule, warnings: &mut Vec<RuleWarning>) {
    if rule.matches > rule.branches.len() {
        warnings.push(RuleWarning::MatchesExceedBranches {
            rule: name.to_string(),
            matches: rule.matches,
            branches: rule.branches.len(),
        });
    }
}

/// In branch order, once `matches` unconditional branches precede a branch
/// it can never be reached.
fn check_shadowed(name: &str, rule: &ConditionalRule, warnings: &mut Vec<RuleWarning>) {
    if rule.randomize || rule.matches == 0 {
        return;
    }

    let mut unconditional = 0;
    for (index, branch) in rule.branches.iter().enumerate() {
        if unconditional >= rule.matches {
            warnings.push(RuleWarning::ShadowedBranch {
                rule: name.to_string(),
                branch: index,
            });
        }
        if branch.condition.is_none() {
            unconditional += 1;
        }
    }
}
