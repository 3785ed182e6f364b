//! Implementation of the `rulegen count` command.

use std::path::PathBuf;

use clap::Args;
use miette::IntoDiagnostic;
use rulegen::count_states;
use serde::Serialize;

use super::read_rules;

/// Arguments for the count command.
#[derive(Debug, Args)]
pub struct CountArgs {
    /// Rule map (.json)
    pub rules: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for count results. Counts can exceed JSON's safe integer
/// range, so they are written as strings.
#[derive(Serialize)]
struct CountResult {
    states: String,
    unbounded: bool,
}

/// Run the count command.
pub fn run_count(args: CountArgs) -> miette::Result<i32> {
    let rules = match read_rules(&args.rules) {
        Ok(rules) => rules,
        Err(code) => return Ok(code),
    };

    let states = count_states(&rules);
    if args.json {
        let output = CountResult {
            states: states.to_string(),
            unbounded: states.is_unbounded(),
        };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        println!("{states}");
    }
    Ok(exitcode::OK)
}
