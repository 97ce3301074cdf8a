//! Draft rule versions
//!
//! Turns a submitted draft into a validated version record. Nothing is
//! stored here; callers own persistence.

use crate::ast::{validate_rule_ast, RuleNode};
use crate::catalog::FieldCatalog;
use crate::description::{generate_template_description, RuleDecision};
use crate::error::{Result, RuleError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A rule version as submitted by an author
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDraft {
    /// Rule the version belongs to
    pub rule_id: String,

    /// Version number within the rule
    pub version_number: u32,

    /// Unvalidated rule tree
    pub logic_ast: Value,

    /// Decision payload; must carry an `action`
    pub decision: Value,

    /// Author
    pub created_by: String,

    /// Optional change note
    #[serde(default)]
    pub change_summary: Option<String>,

    /// Author-written description
    #[serde(default)]
    pub description: Option<String>,

    /// Prefer `description` over the generated one
    #[serde(default)]
    pub manual_description_override: bool,
}

/// Where a version's description came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DescriptionSource {
    /// Written by the author
    Manual,
    /// Generated from the rule tree
    Template,
}

/// Lifecycle status of a rule version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionStatus {
    /// Editable draft
    Draft,
    /// Reviewed and usable in non-draft rulesets
    Approved,
}

/// A validated draft ready for storage
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedRuleVersion {
    /// Rule the version belongs to
    pub rule_id: String,
    /// Version number within the rule
    pub version_number: u32,
    /// Always [`VersionStatus::Draft`]
    pub status: VersionStatus,
    /// Validated rule tree
    pub logic_ast: RuleNode,
    /// Decision payload as submitted
    pub decision: Value,
    /// Optional change note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_summary: Option<String>,
    /// Author
    pub created_by: String,
    /// Final description
    pub description: String,
    /// Origin of `description`
    pub description_source: DescriptionSource,
}

/// Validate a draft and settle its description
pub fn prepare_draft(draft: RuleDraft, catalog: &FieldCatalog) -> Result<PreparedRuleVersion> {
    let logic_ast: RuleNode = serde_json::from_value(draft.logic_ast)?;
    validate_rule_ast(&logic_ast, catalog)?;

    let action = draft
        .decision
        .get("action")
        .and_then(Value::as_str)
        .filter(|action| !action.is_empty())
        .ok_or(RuleError::MissingAction)?;

    let manual = draft
        .description
        .filter(|text| draft.manual_description_override && !text.is_empty());

    let (description, description_source) = match manual {
        Some(text) => (text, DescriptionSource::Manual),
        None => (
            generate_template_description(&logic_ast, &RuleDecision::new(action)),
            DescriptionSource::Template,
        ),
    };

    debug!(
        rule_id = %draft.rule_id,
        version = draft.version_number,
        source = ?description_source,
        "draft prepared"
    );

    Ok(PreparedRuleVersion {
        rule_id: draft.rule_id,
        version_number: draft.version_number,
        status: VersionStatus::Draft,
        logic_ast,
        decision: draft.decision,
        change_summary: draft.change_summary,
        created_by: draft.created_by,
        description,
        description_source,
    })
}
