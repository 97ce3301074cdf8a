//! Fields command implementation.

use crate::error::Result;
use crate::output::Formatter;
use rule_manager_core::FieldCatalog;

/// Execute the fields command.
pub fn execute_fields(catalog: &FieldCatalog, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.fields(&catalog.fields())?);
    Ok(())
}
