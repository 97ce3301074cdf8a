//! Rule error types

use crate::ast::Operator;
use crate::catalog::FieldType;
use thiserror::Error;

/// Result type alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;

/// Errors raised while parsing or validating rules.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Text that is not a numeric literal
    #[error("Not a number: '{0}'")]
    InvalidNumber(String),

    /// Malformed rule JSON
    #[error("Malformed rule: {0}")]
    Parse(#[from] serde_json::Error),

    /// AND / OR node with fewer than two children
    #[error("{node} node requires at least two children, got {count}")]
    TooFewChildren {
        /// Node type (AND or OR)
        node: &'static str,
        /// Number of children supplied
        count: usize,
    },

    /// Condition without a field key
    #[error("Condition field key cannot be empty")]
    EmptyFieldKey,

    /// Field key missing from the catalog
    #[error("Unknown field key: {0}")]
    UnknownField(String),

    /// Operator not in the field type's operator table
    #[error("Operator {operator} is not allowed for field type {field_type}")]
    OperatorNotAllowed {
        /// Offending operator
        operator: Operator,
        /// Type of the referenced field
        field_type: FieldType,
    },

    /// Unary operator given a value
    #[error("Operator {0} does not allow a value payload")]
    UnexpectedValue(Operator),

    /// Range operator without exactly two values
    #[error("Operator {0} requires a two-item range")]
    RangeRequired(Operator),

    /// Range bounds of the wrong type
    #[error("Range values are invalid for field type {0}")]
    InvalidRangeValues(FieldType),

    /// List operator without a non-empty list
    #[error("Operator {0} requires a non-empty list value")]
    ListRequired(Operator),

    /// List item of the wrong type
    #[error("List value type is invalid for field {0}")]
    InvalidListValue(String),

    /// Scalar operator given a list or nothing
    #[error("Operator {0} requires a scalar value")]
    ScalarRequired(Operator),

    /// String operator on a non-text field
    #[error("Operator {0} requires STRING or LIST field type")]
    TextFieldRequired(Operator),

    /// Scalar of the wrong type
    #[error("Value type is invalid for field type {0}")]
    InvalidValueType(FieldType),

    /// Draft without a decision action
    #[error("decision.action is required")]
    MissingAction,

    /// Referenced ruleset, version or entry does not exist
    #[error("{0}")]
    NotFound(&'static str),

    /// Operation clashes with the current ruleset state
    #[error("{0}")]
    Conflict(&'static str),

    /// Ruleset input breaks a ruleset invariant
    #[error("{0}")]
    InvalidRuleset(&'static str),
}

impl RuleError {
    /// HTTP-style status class of the error: 404, 409 or 400.
    pub fn status_code(&self) -> u16 {
        match self {
            RuleError::NotFound(_) => 404,
            RuleError::Conflict(_) => 409,
            _ => 400,
        }
    }
}
