//! Expansion context for tracking state during recursive generation.

use std::collections::BTreeSet;
use std::mem;

use super::error::GenerationError;
use crate::types::{DataContext, Value};

/// State carried through one generation run.
///
/// The context tracks:
/// - the data context conditions and data rules read from
/// - the expansion stack, bounded by `max_depth`
/// - the data keys and rules used so far
pub struct ExpansionContext<'a> {
    data: &'a DataContext,
    /// Rule names currently being expanded, outermost first.
    call_stack: Vec<String>,
    max_depth: usize,
    used_data: BTreeSet<String>,
    used_rules: BTreeSet<String>,
}

impl<'a> ExpansionContext<'a> {
    pub fn new(data: &'a DataContext, max_depth: usize) -> Self {
        Self {
            data,
            call_stack: Vec::new(),
            max_depth,
            used_data: BTreeSet::new(),
            used_rules: BTreeSet::new(),
        }
    }

    pub fn data(&self) -> &'a DataContext {
        self.data
    }

    /// Look up a data value, recording the key as used when present.
    pub fn read(&mut self, key: &str) -> Option<&'a Value> {
        let value = self.data.get(key)?;
        if !self.used_data.contains(key) {
            self.used_data.insert(key.to_string());
        }
        Some(value)
    }

    /// Record that a condition read these keys.
    pub fn mark_used<'k>(&mut self, keys: impl IntoIterator<Item = &'k str>) {
        for key in keys {
            if self.data.contains_key(key) && !self.used_data.contains(key) {
                self.used_data.insert(key.to_string());
            }
        }
    }

    /// Enter a rule.
    ///
    /// Returns an error if the expansion stack is already `max_depth` deep.
    pub fn push_call(&mut self, name: &str) -> Result<(), GenerationError> {
        if self.call_stack.len() >= self.max_depth {
            return Err(GenerationError::MaxDepthExceeded {
                limit: self.max_depth,
                rule: name.to_string(),
            });
        }
        self.call_stack.push(name.to_string());
        if !self.used_rules.contains(name) {
            self.used_rules.insert(name.to_string());
        }
        Ok(())
    }

    /// Leave the current rule.
    pub fn pop_call(&mut self) {
        self.call_stack.pop();
    }

    pub fn depth(&self) -> usize {
        self.call_stack.len()
    }

    /// Take the used data keys and rules, leaving the context empty.
    pub fn take_used(&mut self) -> (BTreeSet<String>, BTreeSet<String>) {
        (mem::take(&mut self.used_data), mem::take(&mut self.used_rules))
    }
}
