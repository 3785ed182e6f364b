//! Implementation of the `rulegen generate` command.

use std::path::PathBuf;

use clap::Args;
use miette::IntoDiagnostic;
use rulegen::generator::DEFAULT_MAX_DEPTH;
use rulegen::{generate_with, validate_rules, DataContext, GenerateOptions, Generation, RuleMap};
use tracing::info;

use super::{make_rng, print_error, read_context, read_rules};

/// Arguments for the generate command.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Rule map (.json)
    pub rules: PathBuf,

    /// Data context (.json object of numbers, strings and booleans)
    #[arg(long)]
    pub data: PathBuf,

    /// Seed for randomized branch order
    #[arg(long, env = "RULEGEN_SEED")]
    pub seed: Option<u64>,

    /// Maximum nesting of rule expansion
    #[arg(long, env = "RULEGEN_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Output text and used rules/keys as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the generate command.
pub fn run_generate(args: GenerateArgs) -> miette::Result<i32> {
    let (rules, data) = match (read_rules(&args.rules), read_context(&args.data)) {
        (Ok(rules), Ok(data)) => (rules, data),
        (Err(code), _) | (_, Err(code)) => return Ok(code),
    };
    let generation = match generate_validated(&rules, &data, args.seed, args.max_depth) {
        Ok(generation) => generation,
        Err(code) => return Ok(code),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&generation).into_diagnostic()?);
    } else {
        println!("{}", generation.text);
    }
    Ok(exitcode::OK)
}

/// Validate the rule map against the data keys, then generate.
///
/// Problems are reported on stderr; the error value is the exit code.
pub(super) fn generate_validated(
    rules: &RuleMap,
    data: &DataContext,
    seed: Option<u64>,
    max_depth: usize,
) -> Result<Generation, i32> {
    if let Err(errors) = validate_rules(rules, &data.key_set()) {
        for error in &errors {
            print_error(error);
        }
        return Err(exitcode::DATAERR);
    }

    let options = GenerateOptions::builder().max_depth(max_depth).build();
    info!(seed = ?seed, max_depth, "generating");
    generate_with(data, rules, &options, &mut make_rng(seed)).map_err(|e| {
        print_error(&e);
        exitcode::DATAERR
    })
}
