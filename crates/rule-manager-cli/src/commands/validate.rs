//! Validate command implementation.

use crate::cli::RuleFileArgs;
use crate::commands::read_input;
use crate::error::Result;
use crate::output::Formatter;
use rule_manager_core::{load_rule_ast, FieldCatalog};
use tracing::info;

/// Execute the validate command.
pub fn execute_validate(args: RuleFileArgs, catalog: &FieldCatalog, formatter: &Formatter) -> Result<()> {
    let json = read_input(&args.file)?;
    let node = load_rule_ast(&json, catalog)?;
    info!(file = %args.file, "rule tree is valid");

    println!(
        "{}",
        formatter.success(&format!("Rule is valid ({} root)", node.node_type()))
    );
    Ok(())
}
