//! Integration tests for state counting.

use rulegen::{RuleMap, StateCount, count_states};

fn count(json: &str) -> StateCount {
    count_states(&RuleMap::from_json_str(json).unwrap())
}

#[test]
fn test_single_data_rule_root() {
    assert_eq!(count(r#"{ "": { "type": "data", "key": "x" } }"#), StateCount::Finite(1));
}

#[test]
fn test_missing_root_counts_zero() {
    assert_eq!(count(r#"{ "a": { "type": "data", "key": "x" } }"#), StateCount::ZERO);
}

#[test]
fn test_empty_conditional_has_one_output() {
    assert_eq!(
        count(r#"{ "": { "type": "conditional", "branches": [] } }"#),
        StateCount::ONE
    );
}

#[test]
fn test_branches_sum_and_references_multiply() {
    let states = count(
        r#"{
            "": { "type": "conditional", "branches": [
                { "if": "x", "output": "@greeting, @name" },
                { "output": "@name" } ] },
            "greeting": { "type": "conditional", "branches": [
                { "output": "Hi" }, { "output": "Hello" }, { "output": "Hey" } ] },
            "name": { "type": "conditional", "branches": [
                { "output": "@first" }, { "output": "@first @last" } ] },
            "first": { "type": "data", "key": "first" },
            "last": { "type": "data", "key": "last" }
        }"#,
    );
    // greeting 3 * name 2 + name 2
    assert_eq!(states, StateCount::Finite(8));
}

#[test]
fn test_multiple_matches() {
    let branches = r#"[ { "output": "a" }, { "output": "@pair" }, { "output": "c" } ]"#;
    let pair = r#""pair": { "type": "conditional", "branches": [ { "output": "x" }, { "output": "y" } ] }"#;

    // counts 1, 2, 1: singles 4, pairs 2 + 1 + 2 = 5
    let ordered = count(&format!(
        r#"{{ "": {{ "type": "conditional", "matches": 2, "branches": {branches} }}, {pair} }}"#
    ));
    assert_eq!(ordered, StateCount::Finite(9));

    // add the triple 2; randomized pairs count twice and the triple six times
    let unlimited = count(&format!(
        r#"{{ "": {{ "type": "conditional", "matches": 0, "randomize": true, "branches": {branches} }}, {pair} }}"#
    ));
    assert_eq!(unlimited, StateCount::Finite(4 + 5 * 2 + 2 * 6));
}

#[test]
fn test_cycle_is_unbounded() {
    let states = count(
        r#"{
            "": { "type": "conditional", "branches": [ { "output": "@a" }, { "output": "done" } ] },
            "a": { "type": "conditional", "branches": [ { "output": "@b" } ] },
            "b": { "type": "conditional", "branches": [ { "if": "x", "output": "@a" }, { "output": "end" } ] }
        }"#,
    );
    assert_eq!(states, StateCount::Unbounded);
    assert_eq!(states.to_string(), "unbounded");
    assert_eq!(states.finite(), None);
}

#[test]
fn test_unreachable_cycle_does_not_matter() {
    let states = count(
        r#"{
            "": { "type": "conditional", "branches": [ { "output": "a" }, { "output": "b" } ] },
            "loop": { "type": "conditional", "branches": [ { "output": "@loop" } ] }
        }"#,
    );
    assert_eq!(states, StateCount::Finite(2));
}

#[test]
fn test_unknown_reference_counts_one() {
    assert_eq!(
        count(r#"{ "": { "type": "conditional", "branches": [ { "output": "@ghost" }, { "output": "b" } ] } }"#),
        StateCount::Finite(2)
    );
}

#[test]
fn test_counts_saturate() {
    // 100 nested levels of 10 alternatives overflow u128.
    let mut rules = String::from(r#"{ "": { "type": "conditional", "branches": [ { "output": "@l0" } ] }"#);
    for level in 0..100 {
        let next = if level == 99 { String::new() } else { format!("@l{}", level + 1) };
        let branches: Vec<String> = (0..10)
            .map(|i| format!(r#"{{ "output": "{i}{next}" }}"#))
            .collect();
        rules.push_str(&format!(
            r#", "l{level}": {{ "type": "conditional", "branches": [ {} ] }}"#,
            branches.join(", ")
        ));
    }
    rules.push('}');

    assert_eq!(count(&rules), StateCount::Finite(u128::MAX));
}

fn chain(length: usize, last: &str) -> String {
    let mut rules = String::from(r#"{ "": { "type": "conditional", "branches": [ { "output": "@r1" } ] }"#);
    for i in 1..length {
        rules.push_str(&format!(
            r#", "r{i}": {{ "type": "conditional", "branches": [ {{ "output": "@r{}" }}, {{ "output": "x" }} ] }}"#,
            i + 1
        ));
    }
    rules.push_str(&format!(r#", "r{length}": {last} }}"#));
    rules
}

#[test]
fn test_long_chains_are_counted() {
    let states = count(&chain(5000, r#"{ "type": "data", "key": "x" }"#));
    assert_eq!(states, StateCount::Finite(5000));
}

#[test]
fn test_long_cycles_are_unbounded() {
    let states = count(&chain(
        5000,
        r#"{ "type": "conditional", "branches": [ { "output": "@r1" } ] }"#,
    ));
    assert_eq!(states, StateCount::Unbounded);
}
