//! Implementation of the `rulegen check` command.

use std::path::PathBuf;

use clap::Args;
use miette::{IntoDiagnostic, Report};
use owo_colors::{OwoColorize, Stream};
use rulegen::{display_name, lint_rules, validate_rules, KnownKeys, Rule, RuleMap, ValidationError};
use serde::Serialize;

use super::{print_error, print_warning, read_context, read_rules};
use crate::output::ConditionDiagnostic;

/// Arguments for the check command.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Rule map to check (.json)
    pub rules: PathBuf,

    /// Data file whose keys are available to the rules
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Additional available data key (repeatable)
    #[arg(short, long = "key")]
    pub keys: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for check results.
#[derive(Serialize)]
struct CheckResult {
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> miette::Result<i32> {
    let rules = match read_rules(&args.rules) {
        Ok(rules) => rules,
        Err(code) => return Ok(code),
    };

    let mut known_keys: KnownKeys = args.keys.iter().cloned().collect();
    if let Some(data_path) = &args.data {
        match read_context(data_path) {
            Ok(data) => known_keys.extend(data.key_set()),
            Err(code) => return Ok(code),
        }
    }

    let errors = validate_rules(&rules, &known_keys).err().unwrap_or_default();
    let warnings = lint_rules(&rules);

    if args.json {
        let output = CheckResult {
            valid: errors.is_empty(),
            errors: errors.iter().map(ToString::to_string).collect(),
            warnings: warnings.iter().map(ToString::to_string).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        for error in &errors {
            report_validation_error(&rules, error);
        }
        for warning in &warnings {
            print_warning(warning);
        }
        if errors.is_empty() {
            println!(
                "{} {} rule(s), {} warning(s)",
                "ok:".if_supports_color(Stream::Stdout, |text| text.green()),
                rules.len(),
                warnings.len()
            );
        }
    }

    if errors.is_empty() {
        Ok(exitcode::OK)
    } else {
        Ok(exitcode::DATAERR)
    }
}

/// Print a validation error. Condition syntax errors are shown with the
/// offending part of the condition highlighted.
fn report_validation_error(rules: &RuleMap, error: &ValidationError) {
    if let ValidationError::InvalidCondition {
        rule,
        branch,
        source,
    } = error
    {
        if let Some(condition) = branch_condition(rules, rule, *branch) {
            let origin = format!("rule '{}' branch {branch}", display_name(rule));
            let diagnostic = ConditionDiagnostic::new(origin, condition, source);
            eprintln!("{:?}", Report::new(diagnostic));
            return;
        }
    }
    print_error(error);
}

fn branch_condition<'a>(rules: &'a RuleMap, rule: &str, branch: usize) -> Option<&'a str> {
    match rules.get(rule)? {
        Rule::Conditional(conditional) => conditional.branches.get(branch)?.condition.as_deref(),
        Rule::Data(_) => None,
    }
}
