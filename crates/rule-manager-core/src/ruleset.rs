//! Rulesets: ordered bundles of rule versions
//!
//! A ruleset owns numbered versions. Each version moves through
//! DRAFT → APPROVED → ACTIVE, and only a DRAFT version may be edited.
//! At most one version of a ruleset is ACTIVE; activating another one
//! demotes it back to APPROVED.
//!
//! Everything here is in memory. Callers load and store the records.

use crate::draft::VersionStatus;
use crate::error::{Result, RuleError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Lifecycle status of a ruleset version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RulesetStatus {
    /// Editable
    Draft,
    /// Frozen and ready to activate
    Approved,
    /// The version in force
    Active,
}

impl RulesetStatus {
    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            RulesetStatus::Draft => "DRAFT",
            RulesetStatus::Approved => "APPROVED",
            RulesetStatus::Active => "ACTIVE",
        }
    }

    /// Status of a whole ruleset: ACTIVE beats APPROVED beats DRAFT
    pub fn derive(statuses: impl IntoIterator<Item = RulesetStatus>) -> RulesetStatus {
        statuses
            .into_iter()
            .fold(RulesetStatus::Draft, |acc, status| match (acc, status) {
                (RulesetStatus::Active, _) | (_, RulesetStatus::Active) => RulesetStatus::Active,
                (RulesetStatus::Approved, _) | (_, RulesetStatus::Approved) => {
                    RulesetStatus::Approved
                }
                _ => RulesetStatus::Draft,
            })
    }
}

impl fmt::Display for RulesetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the entries of a version are run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionMode {
    /// One after another by `orderPriority`
    Sequential,
    /// All at once, merged by `decisionPrecedence`
    Parallel,
}

impl ExecutionMode {
    /// Wire name of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "SEQUENTIAL",
            ExecutionMode::Parallel => "PARALLEL",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parts of a rule version a ruleset needs to know about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleVersionRef {
    /// Rule version id
    pub rule_version_id: String,
    /// Rule the version belongs to
    pub rule_id: String,
    /// Status of the rule version
    pub status: VersionStatus,
    /// Whether the owning rule is archived
    pub archived: bool,
}

/// One rule version inside a ruleset version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesetEntry {
    /// Entry id
    pub entry_id: String,

    /// Rule the entry points at
    pub rule_id: String,

    /// Rule version the entry points at
    pub rule_version_id: String,

    /// Disabled entries stay in the version but do not run
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Run order; SEQUENTIAL versions only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_priority: Option<i64>,

    /// Status of the referenced rule version, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_version_status: Option<VersionStatus>,

    /// Whether the referenced rule is archived
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub archived: bool,
}

fn default_enabled() -> bool {
    true
}

/// Changes to a version's execution settings; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct VersionSettings {
    /// New execution mode
    pub execution_mode: Option<ExecutionMode>,
    /// New precedence; `Some(None)` clears it
    pub decision_precedence: Option<Option<Value>>,
}

/// Changes to an entry; `None` keeps the current value
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryPatch {
    /// New enabled flag
    pub enabled: Option<bool>,
    /// New order priority
    pub order_priority: Option<i64>,
}

/// A numbered version of a ruleset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesetVersion {
    /// Version id
    pub ruleset_version_id: String,

    /// Owning ruleset
    pub ruleset_id: String,

    /// Version number, starting at 1
    pub version_number: u32,

    /// Lifecycle status
    pub status: RulesetStatus,

    /// Execution mode
    pub execution_mode: ExecutionMode,

    /// Opaque precedence table; required for PARALLEL
    #[serde(default)]
    pub decision_precedence: Option<Value>,

    /// Author
    pub created_by: String,

    /// Approver, once approved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,

    /// Activator, while active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_by: Option<String>,

    /// Rule versions in this ruleset version
    #[serde(default)]
    pub entries: Vec<RulesetEntry>,
}

fn require_precedence_for_parallel(mode: ExecutionMode, precedence: Option<&Value>) -> Result<()> {
    if mode == ExecutionMode::Parallel && precedence.is_none_or(Value::is_null) {
        return Err(RuleError::InvalidRuleset(
            "decisionPrecedence is required when executionMode is PARALLEL",
        ));
    }
    Ok(())
}

impl RulesetVersion {
    /// A fresh DRAFT version with no entries
    pub fn draft(
        ruleset_id: &str,
        version_number: u32,
        execution_mode: ExecutionMode,
        decision_precedence: Option<Value>,
        created_by: impl Into<String>,
    ) -> Result<Self> {
        require_precedence_for_parallel(execution_mode, decision_precedence.as_ref())?;
        Ok(Self {
            ruleset_version_id: format!("{}:v{}", ruleset_id, version_number),
            ruleset_id: ruleset_id.to_string(),
            version_number,
            status: RulesetStatus::Draft,
            execution_mode,
            decision_precedence,
            created_by: created_by.into(),
            approved_by: None,
            activated_by: None,
            entries: Vec::new(),
        })
    }

    /// Whether the version may still be edited
    pub fn is_draft(&self) -> bool {
        self.status == RulesetStatus::Draft
    }

    /// Change execution mode and precedence of a DRAFT version
    pub fn update_settings(&mut self, settings: VersionSettings) -> Result<()> {
        if !self.is_draft() {
            return Err(RuleError::Conflict("only DRAFT ruleset versions can be edited"));
        }

        let mode = settings.execution_mode.unwrap_or(self.execution_mode);
        let precedence = match settings.decision_precedence {
            Some(precedence) => precedence,
            None => self.decision_precedence.clone(),
        };
        require_precedence_for_parallel(mode, precedence.as_ref())?;

        self.execution_mode = mode;
        self.decision_precedence = precedence;
        Ok(())
    }

    /// Add a rule version to a DRAFT version
    pub fn add_entry(
        &mut self,
        rule_version: &RuleVersionRef,
        enabled: bool,
        order_priority: Option<i64>,
    ) -> Result<&RulesetEntry> {
        if !self.is_draft() {
            return Err(RuleError::Conflict(
                "entries can only be added to DRAFT ruleset versions",
            ));
        }
        if self.execution_mode == ExecutionMode::Parallel
            && self.decision_precedence.as_ref().is_none_or(Value::is_null)
        {
            return Err(RuleError::InvalidRuleset(
                "decisionPrecedence must be defined for PARALLEL execution mode",
            ));
        }
        if rule_version.archived {
            return Err(RuleError::InvalidRuleset("cannot add an archived rule"));
        }
        if self
            .entries
            .iter()
            .any(|entry| entry.rule_version_id == rule_version.rule_version_id)
        {
            return Err(RuleError::Conflict("duplicate ruleVersionId in ruleset version"));
        }

        let order_priority = match self.execution_mode {
            ExecutionMode::Sequential => {
                let priority = order_priority.ok_or(RuleError::InvalidRuleset(
                    "orderPriority is required for SEQUENTIAL execution mode",
                ))?;
                self.ensure_priority_free(priority, None)?;
                Some(priority)
            }
            ExecutionMode::Parallel => None,
        };

        debug!(
            ruleset_version = %self.ruleset_version_id,
            rule_version = %rule_version.rule_version_id,
            ?order_priority,
            "entry added"
        );

        self.entries.push(RulesetEntry {
            entry_id: format!("{}:{}", self.ruleset_version_id, rule_version.rule_version_id),
            rule_id: rule_version.rule_id.clone(),
            rule_version_id: rule_version.rule_version_id.clone(),
            enabled,
            order_priority,
            rule_version_status: Some(rule_version.status),
            archived: false,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Toggle or reorder an entry of a DRAFT version
    pub fn patch_entry(&mut self, entry_id: &str, patch: EntryPatch) -> Result<&RulesetEntry> {
        let index = self.entry_index(entry_id)?;
        if !self.is_draft() {
            return Err(RuleError::Conflict(
                "entry can only be edited in DRAFT ruleset versions",
            ));
        }

        if let Some(priority) = patch.order_priority {
            if self.execution_mode != ExecutionMode::Sequential {
                return Err(RuleError::InvalidRuleset(
                    "orderPriority can only be changed for SEQUENTIAL mode",
                ));
            }
            self.ensure_priority_free(priority, Some(entry_id))?;
        }

        let entry = &mut self.entries[index];
        if let Some(enabled) = patch.enabled {
            entry.enabled = enabled;
        }
        if patch.order_priority.is_some() {
            entry.order_priority = patch.order_priority;
        }
        Ok(entry)
    }

    /// Remove an entry from a DRAFT version
    pub fn delete_entry(&mut self, entry_id: &str) -> Result<RulesetEntry> {
        let index = self.entry_index(entry_id)?;
        if !self.is_draft() {
            return Err(RuleError::Conflict(
                "entry can only be deleted in DRAFT ruleset versions",
            ));
        }
        Ok(self.entries.remove(index))
    }

    /// Entries in run order: by priority, then insertion order
    pub fn ordered_entries(&self) -> Vec<&RulesetEntry> {
        let mut entries: Vec<&RulesetEntry> = self.entries.iter().collect();
        if self.execution_mode == ExecutionMode::Sequential {
            entries.sort_by_key(|entry| entry.order_priority);
        }
        entries
    }

    /// Check a loaded version against the invariants the editing operations keep
    pub fn validate(&self) -> Result<()> {
        require_precedence_for_parallel(self.execution_mode, self.decision_precedence.as_ref())?;

        let mut rule_versions = HashSet::new();
        let mut priorities = HashSet::new();
        for entry in &self.entries {
            if entry.archived {
                return Err(RuleError::InvalidRuleset("cannot add an archived rule"));
            }
            if !self.is_draft() && entry.rule_version_status == Some(VersionStatus::Draft) {
                return Err(RuleError::InvalidRuleset(
                    "cannot add DRAFT rule_version to non-draft ruleset_version",
                ));
            }
            if !rule_versions.insert(entry.rule_version_id.as_str()) {
                return Err(RuleError::Conflict("duplicate ruleVersionId in ruleset version"));
            }
            if self.execution_mode == ExecutionMode::Sequential {
                let priority = entry.order_priority.ok_or(RuleError::InvalidRuleset(
                    "orderPriority is required for SEQUENTIAL execution mode",
                ))?;
                if !priorities.insert(priority) {
                    return Err(RuleError::Conflict(
                        "orderPriority must be unique within a SEQUENTIAL draft ruleset version",
                    ));
                }
            }
        }
        Ok(())
    }

    fn entry_index(&self, entry_id: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|entry| entry.entry_id == entry_id)
            .ok_or(RuleError::NotFound("entry not found"))
    }

    fn ensure_priority_free(&self, priority: i64, except: Option<&str>) -> Result<()> {
        let taken = self.entries.iter().any(|entry| {
            entry.order_priority == Some(priority) && Some(entry.entry_id.as_str()) != except
        });
        if taken {
            return Err(RuleError::Conflict(
                "orderPriority must be unique within a SEQUENTIAL draft ruleset version",
            ));
        }
        Ok(())
    }
}

/// Input for [`Ruleset::create`]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRuleset {
    /// Ruleset id
    pub ruleset_id: String,
    /// Display name
    pub name: String,
    /// Free text description
    pub description: String,
    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Execution mode of the first version
    pub execution_mode: ExecutionMode,
    /// Precedence of the first version
    #[serde(default)]
    pub decision_precedence: Option<Value>,
    /// Author
    pub created_by: String,
}

/// A ruleset with all of its versions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ruleset {
    /// Ruleset id
    pub ruleset_id: String,

    /// Display name
    pub name: String,

    /// Free text description
    #[serde(default)]
    pub description: String,

    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Author
    pub created_by: String,

    /// Versions, oldest first
    #[serde(default)]
    pub versions: Vec<RulesetVersion>,
}

impl Ruleset {
    /// Create a ruleset with an empty DRAFT version 1
    pub fn create(input: NewRuleset) -> Result<Self> {
        let first = RulesetVersion::draft(
            &input.ruleset_id,
            1,
            input.execution_mode,
            input.decision_precedence,
            input.created_by.clone(),
        )?;

        debug!(ruleset = %input.ruleset_id, mode = %input.execution_mode, "ruleset created");

        Ok(Self {
            ruleset_id: input.ruleset_id,
            name: input.name,
            description: input.description,
            tags: input.tags,
            created_by: input.created_by,
            versions: vec![first],
        })
    }

    /// Status of the ruleset as a whole
    pub fn derived_status(&self) -> RulesetStatus {
        RulesetStatus::derive(self.versions.iter().map(|version| version.status))
    }

    /// The ACTIVE version, if any
    pub fn active_version(&self) -> Option<&RulesetVersion> {
        self.versions
            .iter()
            .find(|version| version.status == RulesetStatus::Active)
    }

    /// Look up a version
    pub fn version(&self, ruleset_version_id: &str) -> Result<&RulesetVersion> {
        self.versions
            .iter()
            .find(|version| version.ruleset_version_id == ruleset_version_id)
            .ok_or(RuleError::NotFound("ruleset version not found"))
    }

    /// Look up a version for editing
    pub fn version_mut(&mut self, ruleset_version_id: &str) -> Result<&mut RulesetVersion> {
        self.versions
            .iter_mut()
            .find(|version| version.ruleset_version_id == ruleset_version_id)
            .ok_or(RuleError::NotFound("ruleset version not found"))
    }

    /// Start a DRAFT version copying the settings and entries of the latest one
    pub fn new_version(&mut self, created_by: impl Into<String>) -> Result<&RulesetVersion> {
        let latest = self
            .versions
            .iter()
            .max_by_key(|version| version.version_number)
            .ok_or(RuleError::NotFound("ruleset not found or has no versions"))?;

        let mut next = RulesetVersion::draft(
            &self.ruleset_id,
            latest.version_number + 1,
            latest.execution_mode,
            latest.decision_precedence.clone(),
            created_by,
        )?;
        next.entries = latest
            .entries
            .iter()
            .map(|entry| RulesetEntry {
                entry_id: format!("{}:{}", next.ruleset_version_id, entry.rule_version_id),
                ..entry.clone()
            })
            .collect();

        debug!(ruleset = %self.ruleset_id, version = next.version_number, "version created");

        self.versions.push(next);
        Ok(&self.versions[self.versions.len() - 1])
    }

    /// Freeze a DRAFT version
    pub fn approve(&mut self, ruleset_version_id: &str, actor: &str) -> Result<&RulesetVersion> {
        let version = self.version_mut(ruleset_version_id)?;
        if !version.is_draft() {
            return Err(RuleError::Conflict("only DRAFT ruleset versions can be approved"));
        }
        version.status = RulesetStatus::Approved;
        version.approved_by = Some(actor.to_string());
        Ok(version)
    }

    /// Make an APPROVED version the ACTIVE one, demoting the previous ACTIVE version
    pub fn activate(&mut self, ruleset_version_id: &str, actor: &str) -> Result<&RulesetVersion> {
        self.activate_checked(ruleset_version_id, actor, None)
    }

    /// Re-activate an earlier version, which must belong to `ruleset_id`
    pub fn rollback_activate(
        &mut self,
        ruleset_id: &str,
        ruleset_version_id: &str,
        actor: &str,
    ) -> Result<&RulesetVersion> {
        self.activate_checked(ruleset_version_id, actor, Some(ruleset_id))
    }

    fn activate_checked(
        &mut self,
        ruleset_version_id: &str,
        actor: &str,
        expected_ruleset: Option<&str>,
    ) -> Result<&RulesetVersion> {
        let target = self.version(ruleset_version_id)?;
        if expected_ruleset.is_some_and(|expected| target.ruleset_id != expected) {
            return Err(RuleError::InvalidRuleset(
                "rulesetVersionId does not belong to the specified ruleset",
            ));
        }
        if target.status != RulesetStatus::Approved {
            return Err(RuleError::Conflict("only APPROVED versions can be activated"));
        }

        for version in &mut self.versions {
            if version.ruleset_version_id == ruleset_version_id {
                version.status = RulesetStatus::Active;
                version.activated_by = Some(actor.to_string());
            } else if version.status == RulesetStatus::Active {
                version.status = RulesetStatus::Approved;
                version.activated_by = None;
            }
        }

        debug!(ruleset = %self.ruleset_id, version = %ruleset_version_id, "version activated");
        self.version(ruleset_version_id)
    }

    /// Check every version plus the single-ACTIVE rule
    pub fn validate(&self) -> Result<()> {
        for version in &self.versions {
            if version.ruleset_id != self.ruleset_id {
                return Err(RuleError::InvalidRuleset(
                    "rulesetVersionId does not belong to the specified ruleset",
                ));
            }
            version.validate()?;
        }
        let active = self
            .versions
            .iter()
            .filter(|version| version.status == RulesetStatus::Active)
            .count();
        if active > 1 {
            return Err(RuleError::Conflict("a ruleset can have only one ACTIVE version"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn version(id: &str, number: u32, status: RulesetStatus) -> RulesetVersion {
        RulesetVersion {
            ruleset_version_id: id.to_string(),
            ruleset_id: "rs1".to_string(),
            version_number: number,
            status,
            execution_mode: ExecutionMode::Sequential,
            decision_precedence: None,
            created_by: "a".to_string(),
            approved_by: Some("a".to_string()),
            activated_by: None,
            entries: Vec::new(),
        }
    }

    // rs1 with v1 ACTIVE and v2 APPROVED, both SEQUENTIAL
    fn fixture() -> Ruleset {
        let mut active = version("rv1", 1, RulesetStatus::Active);
        active.activated_by = Some("a".to_string());
        Ruleset {
            ruleset_id: "rs1".to_string(),
            name: "Card fraud".to_string(),
            description: String::new(),
            tags: Vec::new(),
            created_by: "a".to_string(),
            versions: vec![active, version("rv2", 2, RulesetStatus::Approved)],
        }
    }

    fn rule_version(id: &str) -> RuleVersionRef {
        RuleVersionRef {
            rule_version_id: id.to_string(),
            rule_id: "rule-1".to_string(),
            status: VersionStatus::Approved,
            archived: false,
        }
    }

    #[test]
    fn test_derive_status() {
        use RulesetStatus::*;
        assert_eq!(RulesetStatus::derive(std::iter::empty()), Draft);
        assert_eq!(RulesetStatus::derive([Draft, Draft]), Draft);
        assert_eq!(RulesetStatus::derive([Draft, Approved]), Approved);
        assert_eq!(RulesetStatus::derive([Approved, Active, Draft]), Active);
        assert_eq!(fixture().derived_status(), Active);
    }

    #[test]
    fn test_activate_leaves_single_active_version() {
        let mut ruleset = fixture();
        ruleset.activate("rv2", "actor").unwrap();

        assert_eq!(ruleset.version("rv2").unwrap().status, RulesetStatus::Active);
        assert_eq!(ruleset.version("rv2").unwrap().activated_by.as_deref(), Some("actor"));
        let active = ruleset
            .versions
            .iter()
            .filter(|v| v.status == RulesetStatus::Active)
            .count();
        assert_eq!(active, 1);

        let demoted = ruleset.version("rv1").unwrap();
        assert_eq!(demoted.status, RulesetStatus::Approved);
        assert!(demoted.activated_by.is_none());
    }

    #[test]
    fn test_activate_requires_approved() {
        let mut ruleset = fixture();
        let err = ruleset.activate("rv1", "actor").unwrap_err();
        assert_eq!(err.to_string(), "only APPROVED versions can be activated");
        assert_eq!(err.status_code(), 409);

        let err = ruleset.activate("rv9", "actor").unwrap_err();
        assert_eq!(err.to_string(), "ruleset version not found");
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_rollback_checks_owner() {
        let mut ruleset = fixture();
        let err = ruleset.rollback_activate("rs2", "rv2", "actor").unwrap_err();
        assert_eq!(err.to_string(), "rulesetVersionId does not belong to the specified ruleset");
        assert_eq!(err.status_code(), 400);

        ruleset.rollback_activate("rs1", "rv2", "actor").unwrap();
        assert_eq!(ruleset.active_version().unwrap().ruleset_version_id, "rv2");
    }

    #[test]
    fn test_settings_of_approved_version_rejected() {
        let mut ruleset = fixture();
        ruleset.versions[0].status = RulesetStatus::Approved;
        let err = ruleset
            .version_mut("rv1")
            .unwrap()
            .update_settings(VersionSettings {
                execution_mode: Some(ExecutionMode::Sequential),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, RuleError::Conflict(_)));
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_parallel_needs_precedence() {
        let mut draft = RulesetVersion::draft("rs1", 1, ExecutionMode::Sequential, None, "a").unwrap();
        let err = draft
            .update_settings(VersionSettings {
                execution_mode: Some(ExecutionMode::Parallel),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "decisionPrecedence is required when executionMode is PARALLEL");
        assert_eq!(draft.execution_mode, ExecutionMode::Sequential);

        draft
            .update_settings(VersionSettings {
                execution_mode: Some(ExecutionMode::Parallel),
                decision_precedence: Some(Some(json!(["BLOCK", "REVIEW", "ALLOW"]))),
            })
            .unwrap();
        assert_eq!(draft.execution_mode, ExecutionMode::Parallel);

        let err = draft
            .update_settings(VersionSettings {
                decision_precedence: Some(None),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.status_code(), 400);

        let err = RulesetVersion::draft("rs1", 1, ExecutionMode::Parallel, Some(Value::Null), "a")
            .unwrap_err();
        assert!(matches!(err, RuleError::InvalidRuleset(_)));
    }

    #[test]
    fn test_add_entry_to_active_version_rejected() {
        let mut ruleset = fixture();
        let err = ruleset
            .version_mut("rv1")
            .unwrap()
            .add_entry(&rule_version("rule-v1"), true, None)
            .unwrap_err();
        assert!(err.to_string().contains("DRAFT ruleset versions"));
    }

    #[test]
    fn test_sequential_entries() {
        let mut ruleset = fixture();
        ruleset.versions[0].status = RulesetStatus::Draft;
        let draft = ruleset.version_mut("rv1").unwrap();

        let err = draft.add_entry(&rule_version("rule-v1"), true, None).unwrap_err();
        assert!(err.to_string().contains("orderPriority is required"));

        let created = draft.add_entry(&rule_version("rule-v1"), true, Some(10)).unwrap();
        assert_eq!(created.order_priority, Some(10));

        let err = draft.add_entry(&rule_version("rule-v1"), true, Some(11)).unwrap_err();
        assert!(err.to_string().contains("duplicate ruleVersionId"));
        assert_eq!(draft.entries.len(), 1);

        let err = draft.add_entry(&rule_version("rule-v2"), true, Some(10)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "orderPriority must be unique within a SEQUENTIAL draft ruleset version"
        );
    }

    #[test]
    fn test_archived_rule_rejected() {
        let mut draft = RulesetVersion::draft("rs1", 1, ExecutionMode::Sequential, None, "a").unwrap();
        let mut archived = rule_version("rule-v1");
        archived.archived = true;
        let err = draft.add_entry(&archived, true, Some(1)).unwrap_err();
        assert_eq!(err.to_string(), "cannot add an archived rule");
    }

    #[test]
    fn test_parallel_entries_drop_priority() {
        let mut draft = RulesetVersion::draft(
            "rs1",
            1,
            ExecutionMode::Parallel,
            Some(json!(["BLOCK", "ALLOW"])),
            "a",
        )
        .unwrap();
        let entry = draft.add_entry(&rule_version("rule-v1"), false, Some(5)).unwrap();
        assert_eq!(entry.order_priority, None);
        assert!(!entry.enabled);

        let entry_id = entry.entry_id.clone();
        let err = draft
            .patch_entry(&entry_id, EntryPatch { order_priority: Some(1), ..Default::default() })
            .unwrap_err();
        assert_eq!(err.to_string(), "orderPriority can only be changed for SEQUENTIAL mode");
    }

    #[test]
    fn test_patch_and_delete_entries() {
        let mut draft = RulesetVersion::draft("rs1", 1, ExecutionMode::Sequential, None, "a").unwrap();
        let first = draft.add_entry(&rule_version("rule-v1"), true, Some(20)).unwrap().entry_id.clone();
        let second = draft.add_entry(&rule_version("rule-v2"), true, Some(10)).unwrap().entry_id.clone();

        let order: Vec<&str> = draft.ordered_entries().iter().map(|e| e.rule_version_id.as_str()).collect();
        assert_eq!(order, ["rule-v2", "rule-v1"]);

        let err = draft
            .patch_entry(&first, EntryPatch { order_priority: Some(10), ..Default::default() })
            .unwrap_err();
        assert_eq!(err.status_code(), 409);

        // Keeping its own priority is not a clash
        let patched = draft
            .patch_entry(&second, EntryPatch { enabled: Some(false), order_priority: Some(10) })
            .unwrap();
        assert!(!patched.enabled);

        assert_eq!(
            draft.patch_entry("nope", EntryPatch::default()).unwrap_err().status_code(),
            404
        );

        draft.delete_entry(&first).unwrap();
        assert_eq!(draft.entries.len(), 1);

        draft.status = RulesetStatus::Approved;
        let err = draft.delete_entry(&second).unwrap_err();
        assert_eq!(err.to_string(), "entry can only be deleted in DRAFT ruleset versions");
        let err = draft.patch_entry(&second, EntryPatch::default()).unwrap_err();
        assert_eq!(err.to_string(), "entry can only be edited in DRAFT ruleset versions");
    }

    #[test]
    fn test_lifecycle() {
        let mut ruleset = Ruleset::create(NewRuleset {
            ruleset_id: "rs9".to_string(),
            name: "Card fraud".to_string(),
            description: "Card-not-present checks".to_string(),
            tags: vec!["cnp".to_string()],
            execution_mode: ExecutionMode::Sequential,
            decision_precedence: None,
            created_by: "analyst".to_string(),
        })
        .unwrap();
        assert_eq!(ruleset.derived_status(), RulesetStatus::Draft);

        ruleset
            .version_mut("rs9:v1")
            .unwrap()
            .add_entry(&rule_version("rule-v1"), true, Some(1))
            .unwrap();

        let approved = ruleset.approve("rs9:v1", "lead").unwrap();
        assert_eq!(approved.approved_by.as_deref(), Some("lead"));
        assert_eq!(ruleset.derived_status(), RulesetStatus::Approved);

        let err = ruleset.approve("rs9:v1", "lead").unwrap_err();
        assert_eq!(err.to_string(), "only DRAFT ruleset versions can be approved");

        ruleset.activate("rs9:v1", "lead").unwrap();
        assert_eq!(ruleset.derived_status(), RulesetStatus::Active);

        let next = ruleset.new_version("analyst").unwrap();
        assert_eq!(next.ruleset_version_id, "rs9:v2");
        assert_eq!(next.status, RulesetStatus::Draft);
        assert_eq!(next.entries.len(), 1);
        assert_eq!(next.entries[0].entry_id, "rs9:v2:rule-v1");
        assert_eq!(next.entries[0].order_priority, Some(1));

        ruleset.validate().unwrap();
    }

    #[test]
    fn test_new_version_without_versions() {
        let mut ruleset = fixture();
        ruleset.versions.clear();
        let err = ruleset.new_version("a").unwrap_err();
        assert_eq!(err.to_string(), "ruleset not found or has no versions");
    }

    #[test]
    fn test_validate_loaded_version() {
        let loaded: RulesetVersion = serde_json::from_value(json!({
            "rulesetVersionId": "rs1:v3",
            "rulesetId": "rs1",
            "versionNumber": 3,
            "status": "APPROVED",
            "executionMode": "SEQUENTIAL",
            "createdBy": "a",
            "entries": [
                { "entryId": "e1", "ruleId": "r1", "ruleVersionId": "r1v1", "orderPriority": 1 },
                { "entryId": "e2", "ruleId": "r2", "ruleVersionId": "r2v1", "orderPriority": 2,
                  "ruleVersionStatus": "DRAFT" }
            ]
        }))
        .unwrap();
        assert!(loaded.entries[0].enabled);

        let err = loaded.validate().unwrap_err();
        assert_eq!(err.to_string(), "cannot add DRAFT rule_version to non-draft ruleset_version");

        let mut fixed = loaded.clone();
        fixed.entries[1].rule_version_status = Some(VersionStatus::Approved);
        fixed.validate().unwrap();

        fixed.entries[1].order_priority = Some(1);
        assert!(matches!(fixed.validate(), Err(RuleError::Conflict(_))));

        fixed.entries[1].order_priority = None;
        assert!(matches!(fixed.validate(), Err(RuleError::InvalidRuleset(_))));
    }

    #[test]
    fn test_validate_single_active() {
        let mut ruleset = fixture();
        ruleset.validate().unwrap();
        ruleset.versions[1].status = RulesetStatus::Active;
        let err = ruleset.validate().unwrap_err();
        assert_eq!(err.to_string(), "a ruleset can have only one ACTIVE version");
    }
}
