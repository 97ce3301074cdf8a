//! Describe command implementation.

use crate::cli::DescribeArgs;
use crate::commands::read_input;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rule_manager_core::{generate_template_description, load_rule_ast, FieldCatalog, RuleDecision};

/// Execute the describe command.
pub fn execute_describe(args: DescribeArgs, catalog: &FieldCatalog, formatter: &Formatter) -> Result<()> {
    if args.action.trim().is_empty() {
        return Err(CliError::InvalidInput("Action cannot be empty".to_string()));
    }

    let json = read_input(&args.file)?;
    let node = load_rule_ast(&json, catalog)?;
    let description = generate_template_description(&node, &RuleDecision::new(args.action));

    println!("{}", formatter.description(&description)?);
    Ok(())
}
