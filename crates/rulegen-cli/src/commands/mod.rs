//! CLI command implementations.

mod check;
mod count;
mod eval;
mod generate;
mod usage;

use std::fmt::Display;
use std::path::Path;

use owo_colors::{OwoColorize, Stream};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rulegen::{load_context, load_rules, DataContext, LoadError, RuleMap};

pub use check::{run_check, CheckArgs};
pub use count::{run_count, CountArgs};
pub use eval::{run_eval, EvalArgs};
pub use generate::{run_generate, GenerateArgs};
pub use usage::{run_usage, UsageArgs};

/// Load a rule map, or report why it could not be loaded and return the
/// exit code to use.
fn read_rules(path: &Path) -> Result<RuleMap, i32> {
    load_rules(path).map_err(|e| report_load_error(&e))
}

/// Load a data context, or report why it could not be loaded and return
/// the exit code to use.
fn read_context(path: &Path) -> Result<DataContext, i32> {
    load_context(path).map_err(|e| report_load_error(&e))
}

fn report_load_error(err: &LoadError) -> i32 {
    print_error(err);
    match err {
        LoadError::Io { .. } => exitcode::NOINPUT,
        LoadError::Parse { .. } => exitcode::DATAERR,
    }
}

/// Print an `error:` line to stderr.
fn print_error(message: impl Display) {
    eprintln!(
        "{} {}",
        "error:".if_supports_color(Stream::Stderr, |text| text.red()),
        message
    );
}

/// Print a `warning:` line to stderr.
fn print_warning(message: impl Display) {
    eprintln!(
        "{} {}",
        "warning:".if_supports_color(Stream::Stderr, |text| text.yellow()),
        message
    );
}

/// A random source seeded from `--seed`, or from the OS when absent.
fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
