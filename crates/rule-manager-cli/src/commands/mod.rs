//! Command implementations.

pub mod check;
pub mod describe;
pub mod draft;
pub mod fields;
pub mod ruleset;
pub mod validate;

pub use self::check::{execute_check, execute_sample};
pub use self::describe::execute_describe;
pub use self::draft::execute_draft;
pub use self::fields::execute_fields;
pub use self::ruleset::execute_ruleset;
pub use self::validate::execute_validate;

use crate::error::Result;
use std::io::Read;

/// Read a JSON input from a file path, or from stdin when the path is `-`.
pub(crate) fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    Ok(std::fs::read_to_string(source)?)
}
