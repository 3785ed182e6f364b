//! Text generation: walking the rule graph from the root.

mod context;
mod count;
mod error;
pub(crate) mod transforms;

pub use count::{StateCount, count_states};
pub use error::{FormatError, GenerationError};
pub use transforms::{apply_case, apply_format};

use std::collections::BTreeSet;

use bon::Builder;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, instrument, trace};

use self::context::ExpansionContext;
use crate::condition::{evaluate_condition_tracked, parse_condition};
use crate::rules::{ConditionalRule, DataRule, ROOT_RULE, Rule, RuleMap, Segment, Template};
use crate::types::DataContext;

/// Default limit on nested rule expansion.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options for a generation run.
#[derive(Debug, Clone, Builder)]
pub struct GenerateOptions {
    /// Maximum number of rules being expanded at once.
    #[builder(default = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The result of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Generation {
    /// The generated text.
    pub text: String,
    /// Data keys read by evaluated conditions or data rules.
    pub used_data: BTreeSet<String>,
    /// Rules expanded during the run, the root included.
    pub used_rules: BTreeSet<String>,
}

/// Generate text from the root rule using the thread-local random source.
pub fn generate(data: &DataContext, rules: &RuleMap) -> Result<Generation, GenerationError> {
    generate_with(data, rules, &GenerateOptions::default(), &mut rand::thread_rng())
}

/// Generate text from the root rule with explicit options and random source.
///
/// The random source is only consulted by rules with `randomize` set.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use rulegen::{DataContext, GenerateOptions, RuleMap, generate_with};
///
/// let rules = RuleMap::from_json_str(r#"{
///     "": { "type": "conditional", "branches": [
///         { "if": "[[age]] >= 18", "output": "@name is an adult." },
///         { "output": "@name is a minor." } ] },
///     "name": { "type": "data", "key": "first name", "case": "first" }
/// }"#).unwrap();
/// let data = DataContext::from_json_str(r#"{"first name": "ada", "age": 36}"#).unwrap();
///
/// let generation = generate_with(
///     &data,
///     &rules,
///     &GenerateOptions::default(),
///     &mut StdRng::seed_from_u64(7),
/// )
/// .unwrap();
/// assert_eq!(generation.text, "Ada is an adult.");
/// assert!(generation.used_data.contains("age"));
/// ```
#[instrument(skip_all, fields(rules = rules.len(), max_depth = options.max_depth))]
pub fn generate_with<R: Rng + ?Sized>(
    data: &DataContext,
    rules: &RuleMap,
    options: &GenerateOptions,
    rng: &mut R,
) -> Result<Generation, GenerationError> {
    if rules.root().is_none() {
        return Err(GenerationError::MissingRoot);
    }

    let mut ctx = ExpansionContext::new(data, options.max_depth);
    let mut generator = Generator { rules, rng };
    let mut text = String::new();
    generator.expand(ROOT_RULE, &mut ctx, &mut text)?;

    let (used_data, used_rules) = ctx.take_used();
    debug!(
        chars = text.chars().count(),
        used_data = used_data.len(),
        used_rules = used_rules.len(),
        "generated text"
    );
    Ok(Generation {
        text,
        used_data,
        used_rules,
    })
}

struct Generator<'r, R: ?Sized> {
    rules: &'r RuleMap,
    rng: &'r mut R,
}

impl<R: Rng + ?Sized> Generator<'_, R> {
    /// Expand a rule known to exist, appending its text to `out`.
    fn expand(
        &mut self,
        name: &str,
        ctx: &mut ExpansionContext<'_>,
        out: &mut String,
    ) -> Result<(), GenerationError> {
        let Some(rule) = self.rules.get(name) else {
            return Err(GenerationError::MissingRoot);
        };

        ctx.push_call(name)?;
        debug!(rule = name, depth = ctx.depth(), "expanding rule");
        let result = match rule {
            Rule::Data(data) => expand_data(name, data, ctx, out),
            Rule::Conditional(conditional) => self.expand_conditional(name, conditional, ctx, out),
        };
        ctx.pop_call();
        result
    }

    fn expand_conditional(
        &mut self,
        name: &str,
        rule: &ConditionalRule,
        ctx: &mut ExpansionContext<'_>,
        out: &mut String,
    ) -> Result<(), GenerationError> {
        let mut order: Vec<usize> = (0..rule.branches.len()).collect();
        if rule.randomize {
            order.shuffle(&mut *self.rng);
        }

        let mut matched = 0;
        for index in order {
            if rule.matches != 0 && matched >= rule.matches {
                break;
            }
            let branch = &rule.branches[index];
            if let Some(source) = &branch.condition {
                let expr = parse_condition(source).map_err(|source| {
                    GenerationError::InvalidCondition {
                        rule: name.to_string(),
                        branch: index,
                        source,
                    }
                })?;
                let (satisfied, reads) =
                    evaluate_condition_tracked(&expr, ctx.data()).map_err(|source| {
                        GenerationError::Evaluation {
                            rule: name.to_string(),
                            branch: index,
                            source,
                        }
                    })?;
                ctx.mark_used(reads.iter().map(String::as_str));
                trace!(rule = name, branch = index, condition = %expr, satisfied, "evaluated condition");
                if !satisfied {
                    continue;
                }
            }

            debug!(rule = name, branch = index, "branch matched");
            matched += 1;
            self.expand_template(name, index, &branch.output, ctx, out)?;
        }
        Ok(())
    }

    fn expand_template(
        &mut self,
        name: &str,
        index: usize,
        template: &Template,
        ctx: &mut ExpansionContext<'_>,
        out: &mut String,
    ) -> Result<(), GenerationError> {
        for segment in template.segments() {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Reference(reference) => {
                    if !self.rules.contains(reference) {
                        return Err(GenerationError::UnknownRule {
                            rule: name.to_string(),
                            branch: index,
                            reference: reference.clone(),
                        });
                    }
                    self.expand(reference, ctx, out)?;
                }
            }
        }
        Ok(())
    }
}

fn expand_data(
    name: &str,
    rule: &DataRule,
    ctx: &mut ExpansionContext<'_>,
    out: &mut String,
) -> Result<(), GenerationError> {
    let value = ctx.read(&rule.key).ok_or_else(|| GenerationError::MissingData {
        rule: name.to_string(),
        key: rule.key.clone(),
    })?;

    let text = apply_case(&value.to_string(), rule.case);
    match &rule.format {
        Some(format) => {
            let formatted = apply_format(&text, format).map_err(|source| GenerationError::Format {
                rule: name.to_string(),
                source,
            })?;
            out.push_str(&formatted);
        }
        None => out.push_str(&text),
    }
    Ok(())
}
