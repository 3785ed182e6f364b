//! Implementation of the `rulegen eval` command.

use clap::Args;
use miette::{IntoDiagnostic, Report};
use rulegen::types::parse_decimal;
use rulegen::{evaluate, parse_condition, serialize_condition, DataContext, Value};
use serde::Serialize;

use super::print_error;
use crate::output::ConditionDiagnostic;

/// Arguments for the eval command.
#[derive(Debug, Args)]
pub struct EvalArgs {
    /// Condition expression to evaluate
    pub condition: String,

    /// Variables in name=value format (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Also print the canonical form of the condition
    #[arg(long)]
    pub canonical: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for eval results.
#[derive(Serialize)]
pub struct EvalResult {
    pub result: Value,
    pub truthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
}

/// Parse a key=value parameter string.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid parameter format '{}': expected name=value", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Interpret a parameter value: `true`/`false`, a decimal number, or text.
fn parse_param_value(text: String) -> Value {
    match text.as_str() {
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        other => match parse_decimal(other) {
            Some(n) => Value::Number(n),
            None => Value::String(text),
        },
    }
}

/// Run the eval command.
pub fn run_eval(args: EvalArgs) -> miette::Result<i32> {
    let expr = match parse_condition(&args.condition) {
        Ok(expr) => expr,
        Err(e) => {
            let diagnostic = ConditionDiagnostic::new("condition", &args.condition, &e);
            eprintln!("{:?}", Report::new(diagnostic));
            return Ok(exitcode::DATAERR);
        }
    };

    let data: DataContext = args
        .params
        .into_iter()
        .map(|(k, v)| (k, parse_param_value(v)))
        .collect();

    let canonical = args.canonical.then(|| serialize_condition(&expr));
    match evaluate(&expr, &data) {
        Ok(result) => {
            if args.json {
                let output = EvalResult {
                    truthy: result.is_truthy(),
                    result,
                    canonical,
                };
                println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                if let Some(canonical) = canonical {
                    println!("{canonical}");
                }
                println!("{result}");
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            if args.json {
                let output = serde_json::json!({
                    "error": e.to_string()
                });
                eprintln!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                print_error(format!("evaluation failed: {e}"));
            }
            Ok(exitcode::DATAERR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_val_splits_on_first_equals() {
        assert_eq!(
            parse_key_val("test var=a=b"),
            Ok(("test var".to_string(), "a=b".to_string()))
        );
        assert!(parse_key_val("novalue").is_err());
    }

    #[test]
    fn param_values_are_typed() {
        assert_eq!(parse_param_value("7".to_string()), Value::Number(7.0));
        assert_eq!(parse_param_value("false".to_string()), Value::Boolean(false));
        assert_eq!(
            parse_param_value("Cool beans!".to_string()),
            Value::String("Cool beans!".to_string())
        );
    }
}
