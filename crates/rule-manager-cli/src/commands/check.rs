//! Check command implementation.

use crate::cli::CheckArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rule_manager_core::Number;
use tracing::debug;

/// Sample evaluated when the CLI runs without a command.
pub const SAMPLE_VALUE: Number = Number::Int(10);
/// Threshold of the sample check.
pub const SAMPLE_THRESHOLD: Number = Number::Int(7);

/// Execute the check command.
pub fn execute_check(args: CheckArgs, formatter: &Formatter) -> Result<()> {
    let value = parse_operand(&args.value)?;
    let threshold = parse_operand(&args.threshold)?;
    print_check(&value, &threshold, formatter)
}

/// Evaluate and print the built-in sample (`10 >= 7`).
pub fn execute_sample(formatter: &Formatter) -> Result<()> {
    print_check(&SAMPLE_VALUE, &SAMPLE_THRESHOLD, formatter)
}

fn print_check(value: &Number, threshold: &Number, formatter: &Formatter) -> Result<()> {
    let result = value.meets(threshold);
    debug!(%value, %threshold, result, "rule checked");
    println!("{}", formatter.rule_check(value, threshold, result)?);
    Ok(())
}

fn parse_operand(input: &str) -> Result<Number> {
    input
        .parse::<Number>()
        .map_err(|e| CliError::InvalidInput(e.to_string()))
}
