//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use rule_manager_core::{FieldDefinition, Number, PreparedRuleVersion, RulesetVersion};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Plain text, no color.
    pub fn plain() -> Self {
        Self::new(OutputFormat::Table, false)
    }

    /// Whether output is JSON.
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Format the outcome of a threshold check.
    ///
    /// Text form: `Rule check: 10 >= 7 -> True`.
    pub fn rule_check(&self, value: &Number, threshold: &Number, result: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "value": number_json(value),
                "threshold": number_json(threshold),
                "result": result,
            }))?),
            OutputFormat::Table => Ok(format!(
                "Rule check: {} >= {} -> {}",
                value,
                threshold,
                verdict(result)
            )),
        }
    }

    /// Format the field catalog.
    pub fn fields(&self, fields: &[&FieldDefinition]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
            OutputFormat::Table => Ok(self.fields_table(fields)),
        }
    }

    fn fields_table(&self, fields: &[&FieldDefinition]) -> String {
        if fields.is_empty() {
            return self.colorize("No fields defined.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Field", "Label", "Type", "Operators"]);

        for field in fields {
            let operators = field
                .field_type
                .allowed_operators()
                .iter()
                .map(|op| op.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            builder.push_record([
                field.field_key.as_str(),
                field.label.as_str(),
                field.field_type.as_str(),
                operators.as_str(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a prepared draft version.
    pub fn prepared_version(&self, version: &PreparedRuleVersion) -> Result<String> {
        if let OutputFormat::Json = self.format {
            return Ok(serde_json::to_string_pretty(version)?);
        }

        let status = wire_name(&version.status)?;
        let source = wire_name(&version.description_source)?;

        let mut builder = Builder::default();
        builder.push_record(["Rule", "Version", "Status", "Source", "Description"]);
        builder.push_record([
            version.rule_id.clone(),
            version.version_number.to_string(),
            status,
            source,
            version.description.clone(),
        ]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format the entries of a ruleset version in run order.
    pub fn ruleset_version(&self, version: &RulesetVersion) -> Result<String> {
        if let OutputFormat::Json = self.format {
            return Ok(serde_json::to_string_pretty(version)?);
        }

        let mut builder = Builder::default();
        builder.push_record(["Priority", "Rule", "Rule Version", "Enabled"]);
        for entry in version.ordered_entries() {
            builder.push_record([
                entry
                    .order_priority
                    .map(|priority| priority.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                entry.rule_id.clone(),
                entry.rule_version_id.clone(),
                entry.enabled.to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(format!(
            "{} v{} ({}, {})\n{}",
            version.ruleset_id,
            version.version_number,
            version.status,
            version.execution_mode,
            table
        ))
    }

    /// Format a template description.
    pub fn description(&self, description: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "description": description,
            }))?),
            OutputFormat::Table => Ok(description.to_string()),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Serialized name of a unit enum variant (e.g. `DRAFT`).
fn wire_name<T: serde::Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value)?;
    Ok(value.as_str().unwrap_or_default().to_string())
}

fn number_json(number: &Number) -> serde_json::Value {
    match *number {
        Number::Int(i) => serde_json::Value::from(i),
        Number::Float(f) => serde_json::Value::from(f),
    }
}

/// Capitalized boolean, as printed in check lines.
pub fn verdict(result: bool) -> &'static str {
    if result {
        "True"
    } else {
        "False"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rule_manager_core::FieldCatalog;

    #[test]
    fn test_rule_check_line() {
        let formatter = Formatter::plain();
        let line = formatter
            .rule_check(&Number::Int(10), &Number::Int(7), true)
            .unwrap();
        assert_eq!(line, "Rule check: 10 >= 7 -> True");

        let line = formatter
            .rule_check(&Number::Float(2.5), &Number::Int(3), false)
            .unwrap();
        assert_eq!(line, "Rule check: 2.5 >= 3 -> False");
    }

    #[test]
    fn test_rule_check_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .rule_check(&Number::Int(3), &Number::Int(5), false)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["result"], false);
        assert_eq!(value["threshold"], 5);
        assert_eq!(value["value"], 3);
    }

    #[test]
    fn test_fields_table() {
        let catalog = FieldCatalog::builtin();
        let formatter = Formatter::plain();
        let output = formatter.fields(&catalog.fields()).unwrap();
        assert!(output.contains("Field"));
        assert!(output.contains("txn.amount"));
        assert!(output.contains("MATCHES_REGEX"));
    }

    #[test]
    fn test_fields_json() {
        let catalog = FieldCatalog::builtin();
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.fields(&catalog.fields()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["fieldKey"], "account.tags");
        assert!(value[0].get("field_key").is_none());
        assert_eq!(value[0]["type"], "LIST");
    }

    #[test]
    fn test_ruleset_version_table() {
        let version: RulesetVersion = serde_json::from_value(serde_json::json!({
            "rulesetVersionId": "rs1:v2",
            "rulesetId": "rs1",
            "versionNumber": 2,
            "status": "DRAFT",
            "executionMode": "SEQUENTIAL",
            "createdBy": "analyst",
            "entries": [
                { "entryId": "e1", "ruleId": "velocity", "ruleVersionId": "velocity:v3", "orderPriority": 20 },
                { "entryId": "e2", "ruleId": "geo", "ruleVersionId": "geo:v1", "orderPriority": 10, "enabled": false }
            ]
        }))
        .unwrap();

        let output = Formatter::plain().ruleset_version(&version).unwrap();
        assert!(output.starts_with("rs1 v2 (DRAFT, SEQUENTIAL)\n"));
        let geo = output.find("geo:v1").unwrap();
        let velocity = output.find("velocity:v3").unwrap();
        assert!(geo < velocity);
        assert!(output.contains("false"));

        let json = Formatter::new(OutputFormat::Json, false)
            .ruleset_version(&version)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["entries"][0]["ruleVersionId"], "velocity:v3");
    }

    #[test]
    fn test_empty_fields() {
        let formatter = Formatter::plain();
        let output = formatter.fields(&[]).unwrap();
        assert!(output.contains("No fields defined"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::plain();
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
