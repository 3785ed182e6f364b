//! Implementation of the `rulegen usage` command.

use std::path::PathBuf;

use clap::Args;
use rulegen::display_name;
use rulegen::generator::DEFAULT_MAX_DEPTH;

use super::generate::generate_validated;
use super::{read_context, read_rules};
use crate::output::table::{format_usage_table, UsageKind, UsageRow};

/// Arguments for the usage command.
#[derive(Debug, Args)]
pub struct UsageArgs {
    /// Rule map (.json)
    pub rules: PathBuf,

    /// Data context (.json)
    #[arg(long)]
    pub data: PathBuf,

    /// Seed for randomized branch order
    #[arg(long, env = "RULEGEN_SEED")]
    pub seed: Option<u64>,
}

/// Run the usage command.
pub fn run_usage(args: UsageArgs) -> miette::Result<i32> {
    let (rules, data) = match (read_rules(&args.rules), read_context(&args.data)) {
        (Ok(rules), Ok(data)) => (rules, data),
        (Err(code), _) | (_, Err(code)) => return Ok(code),
    };
    let generation = match generate_validated(&rules, &data, args.seed, DEFAULT_MAX_DEPTH) {
        Ok(generation) => generation,
        Err(code) => return Ok(code),
    };

    let rule_rows = rules.names().map(|name| UsageRow {
        kind: UsageKind::Rule,
        name: display_name(name).to_string(),
        used: generation.used_rules.contains(name),
    });
    let data_rows = data.keys().map(|key| UsageRow {
        kind: UsageKind::Data,
        name: key.to_string(),
        used: generation.used_data.contains(key),
    });
    let rows: Vec<UsageRow> = rule_rows.chain(data_rows).collect();

    println!("{}", format_usage_table(&rows));
    let unused = rows.iter().filter(|row| !row.used).count();
    println!("\n{} of {} entries unused", unused, rows.len());
    Ok(exitcode::OK)
}
