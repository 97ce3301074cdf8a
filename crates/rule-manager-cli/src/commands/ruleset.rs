//! Ruleset command implementation.

use crate::cli::RuleFileArgs;
use crate::commands::read_input;
use crate::error::Result;
use crate::output::Formatter;
use rule_manager_core::{RuleError, RulesetVersion};
use tracing::info;

/// Execute the ruleset command: check a ruleset version file and list its entries.
pub fn execute_ruleset(args: RuleFileArgs, formatter: &Formatter) -> Result<()> {
    let json = read_input(&args.file)?;
    let version: RulesetVersion = serde_json::from_str(&json).map_err(RuleError::from)?;
    version.validate()?;
    info!(
        file = %args.file,
        ruleset_version = %version.ruleset_version_id,
        entries = version.entries.len(),
        "ruleset version is valid"
    );

    if !formatter.is_json() {
        println!(
            "{}",
            formatter.success(&format!(
                "Ruleset version is valid ({} entries)",
                version.entries.len()
            ))
        );
    }
    println!("{}", formatter.ruleset_version(&version)?);
    Ok(())
}
