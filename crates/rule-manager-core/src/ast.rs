//! Rule logic trees and their validation against a field catalog
//!
//! A rule is a tree of logical nodes whose leaves are field conditions.
//! The JSON form tags every node with `nodeType`:
//!
//! ```json
//! {
//!   "nodeType": "AND",
//!   "children": [
//!     { "nodeType": "CONDITION", "operator": "GT", "fieldKey": "txn.amount", "value": 100 },
//!     { "nodeType": "NOT", "child": { "nodeType": "CONDITION", "operator": "EQ", "fieldKey": "card.present", "value": true } }
//!   ]
//! }
//! ```

use crate::catalog::{FieldCatalog, FieldType};
use crate::error::{Result, RuleError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Condition operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    /// Equal
    Eq,
    /// Not equal
    Neq,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
    /// Value in list
    In,
    /// Value not in list
    NotIn,
    /// Inside an inclusive range
    Between,
    /// Outside an inclusive range
    NotBetween,
    /// Field is null
    IsNull,
    /// Field is not null
    IsNotNull,
    /// Field is empty
    IsEmpty,
    /// Text contains
    Contains,
    /// Text does not contain
    NotContains,
    /// Text prefix
    StartsWith,
    /// Text suffix
    EndsWith,
    /// Text matches a regular expression
    MatchesRegex,
    /// List field shares a member with the given set
    MemberOf,
    /// List field shares no member with the given set
    NotMemberOf,
}

impl Operator {
    /// Wire name of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "EQ",
            Operator::Neq => "NEQ",
            Operator::Gt => "GT",
            Operator::Gte => "GTE",
            Operator::Lt => "LT",
            Operator::Lte => "LTE",
            Operator::In => "IN",
            Operator::NotIn => "NOT_IN",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT_BETWEEN",
            Operator::IsNull => "IS_NULL",
            Operator::IsNotNull => "IS_NOT_NULL",
            Operator::IsEmpty => "IS_EMPTY",
            Operator::Contains => "CONTAINS",
            Operator::NotContains => "NOT_CONTAINS",
            Operator::StartsWith => "STARTS_WITH",
            Operator::EndsWith => "ENDS_WITH",
            Operator::MatchesRegex => "MATCHES_REGEX",
            Operator::MemberOf => "MEMBER_OF",
            Operator::NotMemberOf => "NOT_MEMBER_OF",
        }
    }

    /// Operators that take no value payload
    pub fn is_unary(&self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull | Operator::IsEmpty)
    }

    /// Operators that take a two-item range
    pub fn is_range(&self) -> bool {
        matches!(self, Operator::Between | Operator::NotBetween)
    }

    /// Operators that take a non-empty list
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Operator::In | Operator::NotIn | Operator::MemberOf | Operator::NotMemberOf
        )
    }

    /// Operators restricted to text fields
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Operator::Contains
                | Operator::NotContains
                | Operator::StartsWith
                | Operator::EndsWith
                | Operator::MatchesRegex
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar condition value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// Boolean
    Bool(bool),
    /// Number
    Number(f64),
    /// String
    Text(String),
}

impl ScalarValue {
    /// Check whether this value is of the given field value type
    pub fn matches(&self, value_type: FieldType) -> bool {
        match value_type {
            FieldType::Number => matches!(self, ScalarValue::Number(_)),
            FieldType::Boolean => matches!(self, ScalarValue::Bool(_)),
            _ => matches!(self, ScalarValue::Text(_)),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Number(n) => write!(f, "{}", n),
            ScalarValue::Text(s) => f.write_str(s),
        }
    }
}

/// Condition payload: a scalar, or a list (a two-item list doubles as a range)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    /// Single value
    Scalar(ScalarValue),
    /// List or range
    List(Vec<ScalarValue>),
}

/// Leaf condition on a catalog field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Operator
    pub operator: Operator,

    /// Referenced catalog field
    pub field_key: String,

    /// Operator payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ConditionValue>,
}

/// Node of a rule logic tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "nodeType")]
pub enum RuleNode {
    /// All children must hold
    #[serde(rename = "AND")]
    And {
        /// At least two children
        children: Vec<RuleNode>,
    },

    /// Any child must hold
    #[serde(rename = "OR")]
    Or {
        /// At least two children
        children: Vec<RuleNode>,
    },

    /// Negation
    #[serde(rename = "NOT")]
    Not {
        /// Negated node
        child: Box<RuleNode>,
    },

    /// Field condition
    #[serde(rename = "CONDITION")]
    Condition(Condition),
}

impl RuleNode {
    /// Wire name of the node type
    pub fn node_type(&self) -> &'static str {
        match self {
            RuleNode::And { .. } => "AND",
            RuleNode::Or { .. } => "OR",
            RuleNode::Not { .. } => "NOT",
            RuleNode::Condition(_) => "CONDITION",
        }
    }
}

/// Decode a rule tree from JSON without validating it
pub fn parse_rule_ast(json: &str) -> Result<RuleNode> {
    Ok(serde_json::from_str(json)?)
}

/// Validate a rule tree against `catalog`
pub fn validate_rule_ast(node: &RuleNode, catalog: &FieldCatalog) -> Result<()> {
    match node {
        RuleNode::And { children } | RuleNode::Or { children } => {
            if children.len() < 2 {
                return Err(RuleError::TooFewChildren {
                    node: node.node_type(),
                    count: children.len(),
                });
            }
            children
                .iter()
                .try_for_each(|child| validate_rule_ast(child, catalog))
        }
        RuleNode::Not { child } => validate_rule_ast(child, catalog),
        RuleNode::Condition(condition) => validate_condition(condition, catalog),
    }
}

/// Decode and validate a rule tree
pub fn load_rule_ast(json: &str, catalog: &FieldCatalog) -> Result<RuleNode> {
    let node = parse_rule_ast(json)?;
    validate_rule_ast(&node, catalog)?;
    debug!(node_type = node.node_type(), "rule tree validated");
    Ok(node)
}

fn validate_condition(condition: &Condition, catalog: &FieldCatalog) -> Result<()> {
    if condition.field_key.is_empty() {
        return Err(RuleError::EmptyFieldKey);
    }

    let field = catalog.require(&condition.field_key)?;
    let operator = condition.operator;
    let field_type = field.field_type;

    if !field_type.allowed_operators().contains(&operator) {
        return Err(RuleError::OperatorNotAllowed {
            operator,
            field_type,
        });
    }

    if operator.is_unary() {
        if condition.value.is_some() {
            return Err(RuleError::UnexpectedValue(operator));
        }
        return Ok(());
    }

    if operator.is_range() {
        let bounds = match &condition.value {
            Some(ConditionValue::List(items)) if items.len() == 2 => items,
            _ => return Err(RuleError::RangeRequired(operator)),
        };
        if !bounds.iter().all(|bound| bound.matches(field_type)) {
            return Err(RuleError::InvalidRangeValues(field_type));
        }
        return Ok(());
    }

    if operator.is_list() {
        let items = match &condition.value {
            Some(ConditionValue::List(items)) if !items.is_empty() => items,
            _ => return Err(RuleError::ListRequired(operator)),
        };
        if !items.iter().all(|item| item.matches(field_type.value_type())) {
            return Err(RuleError::InvalidListValue(condition.field_key.clone()));
        }
        return Ok(());
    }

    let scalar = match &condition.value {
        Some(ConditionValue::Scalar(scalar)) => scalar,
        _ => return Err(RuleError::ScalarRequired(operator)),
    };

    if operator.is_text() && !matches!(field_type, FieldType::String | FieldType::List) {
        return Err(RuleError::TextFieldRequired(operator));
    }

    if !scalar.matches(field_type.value_type()) {
        return Err(RuleError::InvalidValueType(field_type));
    }

    Ok(())
}
