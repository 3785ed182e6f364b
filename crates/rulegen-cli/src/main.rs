//! rulegen CLI entry point.
//!
//! Provides command-line tools for working with rule maps:
//! - `rulegen check` - Validate a rule map and report lint warnings
//! - `rulegen generate` - Generate text from a rule map and data file
//! - `rulegen count` - Count the distinct outputs of a rule map
//! - `rulegen eval` - Evaluate a single condition
//! - `rulegen usage` - Show which rules and data keys a run uses

mod commands;
mod output;

use std::io;
use std::process::exit;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{
    run_check, run_count, run_eval, run_generate, run_usage, CheckArgs, CountArgs, EvalArgs,
    GenerateArgs, UsageArgs,
};
use tracing_subscriber::EnvFilter;

/// Rule-graph text generator tools.
#[derive(Debug, Parser)]
#[command(name = "rulegen")]
#[command(about = "Rule-graph text generator tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Color output control
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Enable verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// When to use colored output.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a rule map against the available data keys
    Check(CheckArgs),
    /// Generate text from a rule map and a data file
    Generate(GenerateArgs),
    /// Count the distinct outputs a rule map can produce
    Count(CountArgs),
    /// Evaluate a condition expression
    Eval(EvalArgs),
    /// Show which rules and data keys a generation run uses
    Usage(UsageArgs),
}

/// Set up color output based on user preference.
fn setup_colors(color_when: ColorWhen) {
    match color_when {
        ColorWhen::Auto => {
            // owo-colors automatically checks TTY, NO_COLOR, FORCE_COLOR
        }
        ColorWhen::Always => {
            owo_colors::set_override(true);
        }
        ColorWhen::Never => {
            owo_colors::set_override(false);
        }
    }
}

/// Log to stderr. `RUST_LOG` takes precedence over `--verbose`.
fn setup_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_colors(cli.color);
    setup_tracing(cli.verbose);

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let result = match cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Generate(args) => run_generate(args),
        Commands::Count(args) => run_count(args),
        Commands::Eval(args) => run_eval(args),
        Commands::Usage(args) => run_usage(args),
    };

    match result {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{:?}", e);
            exit(exitcode::SOFTWARE);
        }
    }
}
