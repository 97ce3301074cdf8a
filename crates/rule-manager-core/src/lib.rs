//! Rule Manager Core
//!
//! This crate contains the rule logic shared by every Rule Manager surface.
//! Everything here is pure: no I/O, no global state, nothing persisted.
//!
//! ## Key Concepts
//!
//! - **Rule check**: the threshold predicate `value >= threshold`
//! - **Rule AST**: a logic tree of AND / OR / NOT nodes over field conditions
//! - **Field catalog**: the fields a rule may reference and the operators each allows
//! - **Template description**: a one-line rendering of a rule and its decision
//! - **Draft**: a validated rule version ready to be handed to storage
//! - **Ruleset**: versioned bundles of rule versions with a DRAFT → APPROVED → ACTIVE lifecycle

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod catalog;
pub mod description;
pub mod draft;
pub mod error;
pub mod evaluate;
pub mod number;
pub mod ruleset;

// Re-exports for convenience
pub use ast::{
    load_rule_ast, parse_rule_ast, validate_rule_ast, Condition, ConditionValue, Operator,
    RuleNode, ScalarValue,
};
pub use catalog::{FieldCatalog, FieldDefinition, FieldType};
pub use description::{generate_template_description, RuleDecision};
pub use draft::{prepare_draft, DescriptionSource, PreparedRuleVersion, RuleDraft, VersionStatus};
pub use error::{Result, RuleError};
pub use evaluate::{evaluate_rule, Numeric};
pub use number::Number;
pub use ruleset::{
    EntryPatch, ExecutionMode, NewRuleset, RuleVersionRef, Ruleset, RulesetEntry, RulesetStatus,
    RulesetVersion, VersionSettings,
};
