//! Counting the distinct outputs a rule map can produce.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::{Add, Mul};

use tracing::{debug, instrument};

use crate::rules::{ConditionalRule, ROOT_RULE, Rule, RuleMap};

/// Number of distinct output paths through a rule map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateCount {
    /// A finite count, saturating at `u128::MAX`.
    Finite(u128),
    /// The rule graph is cyclic, so expansion paths are unbounded.
    Unbounded,
}

impl StateCount {
    pub const ZERO: StateCount = StateCount::Finite(0);
    pub const ONE: StateCount = StateCount::Finite(1);

    /// The count, if finite.
    pub fn finite(self) -> Option<u128> {
        match self {
            StateCount::Finite(n) => Some(n),
            StateCount::Unbounded => None,
        }
    }

    pub fn is_unbounded(self) -> bool {
        self == StateCount::Unbounded
    }
}

impl Add for StateCount {
    type Output = StateCount;

    fn add(self, rhs: StateCount) -> StateCount {
        match (self, rhs) {
            (StateCount::Finite(a), StateCount::Finite(b)) => StateCount::Finite(a.saturating_add(b)),
            _ => StateCount::Unbounded,
        }
    }
}

impl Mul for StateCount {
    type Output = StateCount;

    fn mul(self, rhs: StateCount) -> StateCount {
        match (self, rhs) {
            (StateCount::Finite(a), StateCount::Finite(b)) => StateCount::Finite(a.saturating_mul(b)),
            _ => StateCount::Unbounded,
        }
    }
}

impl Display for StateCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StateCount::Finite(n) => write!(f, "{n}"),
            StateCount::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Count the distinct outputs reachable from the root rule.
///
/// - a data rule contributes one output
/// - a branch contributes the product of its referenced rules' counts
/// - a conditional rule emitting one match sums its branches; emitting up
///   to `k` matches sums the products over every non-empty selection of at
///   most `k` branches, times the orderings of each selection when
///   randomized
/// - a rule reached again while it is being counted makes the whole count
///   [`StateCount::Unbounded`]
///
/// Unknown references count as one output and a missing root as zero.
///
/// # Example
///
/// ```
/// use rulegen::{RuleMap, StateCount, count_states};
///
/// let rules = RuleMap::from_json_str(r#"{
///     "": { "type": "conditional", "branches": [
///         { "if": "x > 1", "output": "@a and @a" },
///         { "output": "nothing" } ] },
///     "a": { "type": "conditional", "branches": [
///         { "output": "one" }, { "output": "two" }, { "output": "three" } ] }
/// }"#).unwrap();
///
/// assert_eq!(count_states(&rules), StateCount::Finite(10));
/// ```
#[instrument(skip_all, fields(rules = rules.len()))]
pub fn count_states(rules: &RuleMap) -> StateCount {
    if rules.root().is_none() {
        return StateCount::ZERO;
    }
    let mut counter = Counter {
        rules,
        memo: BTreeMap::new(),
    };
    let count = counter.count_root();
    debug!(%count, memoized = counter.memo.len(), "counted states");
    count
}

struct Counter<'a> {
    rules: &'a RuleMap,
    /// Counts of completed rules.
    memo: BTreeMap<&'a str, StateCount>,
}

/// A rule being counted and the next of its references to visit.
struct Frame<'a> {
    name: &'a str,
    rule: &'a Rule,
    references: Vec<&'a str>,
    next: usize,
}

impl<'a> Frame<'a> {
    fn new(name: &'a str, rule: &'a Rule) -> Self {
        Frame {
            name,
            rule,
            references: rule.references(),
            next: 0,
        }
    }
}

impl<'a> Counter<'a> {
    /// Post-order walk from the root on an explicit stack.
    ///
    /// A reference back to a rule still on the stack makes the root
    /// unbounded, since every enclosing sum and product absorbs it.
    fn count_root(&mut self) -> StateCount {
        let Some(root) = self.rules.get(ROOT_RULE) else {
            return StateCount::ZERO;
        };
        let mut stack = vec![Frame::new(ROOT_RULE, root)];
        let mut on_stack = BTreeSet::from([ROOT_RULE]);

        while let Some(frame) = stack.last_mut() {
            if let Some(reference) = frame.references.get(frame.next).copied() {
                frame.next += 1;
                if on_stack.contains(reference) {
                    return StateCount::Unbounded;
                }
                if !self.memo.contains_key(reference)
                    && let Some(rule) = self.rules.get(reference)
                {
                    on_stack.insert(reference);
                    stack.push(Frame::new(reference, rule));
                }
            } else {
                let count = match frame.rule {
                    Rule::Data(_) => StateCount::ONE,
                    Rule::Conditional(conditional) => self.count_conditional(conditional),
                };
                let name = frame.name;
                stack.pop();
                on_stack.remove(name);
                self.memo.insert(name, count);
            }
        }
        self.resolved(ROOT_RULE)
    }

    /// Count of a completed rule. Unknown rules count as one output.
    fn resolved(&self, name: &str) -> StateCount {
        self.memo.get(name).copied().unwrap_or(StateCount::ONE)
    }

    fn count_conditional(&self, rule: &ConditionalRule) -> StateCount {
        if rule.branches.is_empty() {
            return StateCount::ONE;
        }

        let branch_counts: Vec<StateCount> = rule
            .branches
            .iter()
            .map(|branch| {
                branch
                    .output
                    .references()
                    .fold(StateCount::ONE, |acc, reference| acc * self.resolved(reference))
            })
            .collect();

        let limit = match rule.matches {
            0 => branch_counts.len(),
            k => k.min(branch_counts.len()),
        };
        selection_count(&branch_counts, limit, rule.randomize)
    }
}

/// Sum over every non-empty selection of at most `limit` items of the
/// product of the selected counts, each multiplied by its number of
/// orderings when `ordered`.
fn selection_count(counts: &[StateCount], limit: usize, ordered: bool) -> StateCount {
    // sums[j] is the elementary symmetric sum of degree j.
    let mut sums = vec![StateCount::ZERO; limit + 1];
    sums[0] = StateCount::ONE;
    for &count in counts {
        for j in (1..=limit).rev() {
            sums[j] = sums[j] + sums[j - 1] * count;
        }
    }

    let mut total = StateCount::ZERO;
    let mut orderings: u128 = 1;
    for (j, sum) in sums.into_iter().enumerate().skip(1) {
        if ordered {
            orderings = orderings.saturating_mul(j as u128);
        }
        total = total + sum * StateCount::Finite(orderings);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finite(values: &[u128]) -> Vec<StateCount> {
        values.iter().copied().map(StateCount::Finite).collect()
    }

    #[test]
    fn single_match_sums_branches() {
        assert_eq!(selection_count(&finite(&[2, 3, 4]), 1, false), StateCount::Finite(9));
    }

    #[test]
    fn pairs_add_products() {
        // 2 + 3 + 4 + (2*3 + 2*4 + 3*4)
        assert_eq!(selection_count(&finite(&[2, 3, 4]), 2, false), StateCount::Finite(35));
        // orderings double every pair
        assert_eq!(selection_count(&finite(&[2, 3, 4]), 2, true), StateCount::Finite(61));
    }

    #[test]
    fn unbounded_absorbs() {
        let counts = vec![StateCount::Finite(1), StateCount::Unbounded];
        assert_eq!(selection_count(&counts, 1, false), StateCount::Unbounded);
    }

    #[test]
    fn arithmetic_saturates() {
        let big = StateCount::Finite(u128::MAX);
        assert_eq!(big + StateCount::ONE, big);
        assert_eq!(big * StateCount::Finite(2), big);
    }
}
