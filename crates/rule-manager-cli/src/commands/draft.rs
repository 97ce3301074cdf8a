//! Draft command implementation.

use crate::cli::RuleFileArgs;
use crate::commands::read_input;
use crate::error::Result;
use crate::output::Formatter;
use rule_manager_core::{prepare_draft, FieldCatalog, RuleDraft};
use tracing::info;

/// Execute the draft command.
pub fn execute_draft(args: RuleFileArgs, catalog: &FieldCatalog, formatter: &Formatter) -> Result<()> {
    let json = read_input(&args.file)?;
    let draft: RuleDraft = serde_json::from_str(&json)?;
    let version = prepare_draft(draft, catalog)?;
    info!(
        rule_id = %version.rule_id,
        version = version.version_number,
        "draft version prepared"
    );

    println!("{}", formatter.prepared_version(&version)?);
    Ok(())
}
