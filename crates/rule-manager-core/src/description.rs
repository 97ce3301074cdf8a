//! Template descriptions for rules
//!
//! Renders a rule tree and its decision into a single sentence such as
//! `BLOCK if txn.amount > 100 AND NOT card.present = true`.

use crate::ast::{Condition, ConditionValue, Operator, RuleNode, ScalarValue};
use serde::{Deserialize, Serialize};

/// Outcome attached to a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDecision {
    /// Action taken when the rule matches (e.g. `BLOCK`)
    #[serde(default)]
    pub action: String,
}

impl RuleDecision {
    /// Create a decision with the given action
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
        }
    }
}

/// Render `node` and `decision` as `<ACTION> if <condition>`
pub fn generate_template_description(node: &RuleNode, decision: &RuleDecision) -> String {
    format!("{} if {}", decision.action.to_uppercase(), render_node(node))
}

fn render_node(node: &RuleNode) -> String {
    match node {
        RuleNode::And { children } => join_children(children, " AND "),
        RuleNode::Or { children } => join_children(children, " OR "),
        RuleNode::Not { child } => {
            let inner = render_node(child);
            match child.as_ref() {
                RuleNode::Condition(_) => format!("NOT {}", inner),
                _ => format!("NOT ({})", inner),
            }
        }
        RuleNode::Condition(condition) => render_condition(condition),
    }
}

fn join_children(children: &[RuleNode], separator: &str) -> String {
    children
        .iter()
        .map(render_node)
        .collect::<Vec<_>>()
        .join(separator)
}

fn render_condition(condition: &Condition) -> String {
    let key = &condition.field_key;
    let op = condition.operator;

    match op {
        Operator::IsNull => format!("{} IS NULL", key),
        Operator::IsNotNull => format!("{} IS NOT NULL", key),
        Operator::IsEmpty => format!("{} IS EMPTY", key),
        Operator::Between | Operator::NotBetween => {
            let keyword = if op == Operator::Between {
                "BETWEEN"
            } else {
                "NOT BETWEEN"
            };
            let bounds = items(condition.value.as_ref());
            let lower = bounds.first().map(|v| format_value(v)).unwrap_or_default();
            let upper = bounds.get(1).map(|v| format_value(v)).unwrap_or_default();
            format!("{} {} {} AND {}", key, keyword, lower, upper)
        }
        Operator::In | Operator::NotIn | Operator::MemberOf | Operator::NotMemberOf => {
            let verb = op.as_str().replace('_', " ");
            let values = items(condition.value.as_ref())
                .into_iter()
                .map(format_value)
                .collect::<Vec<_>>()
                .join(",");
            format!("{} {} {{{}}}", key, verb, values)
        }
        _ => {
            let value = match &condition.value {
                Some(ConditionValue::Scalar(scalar)) => format_value(scalar),
                _ => String::new(),
            };
            format!("{} {} {}", key, comparison_symbol(op), value)
        }
    }
}

fn items(value: Option<&ConditionValue>) -> Vec<&ScalarValue> {
    match value {
        Some(ConditionValue::List(items)) => items.iter().collect(),
        Some(ConditionValue::Scalar(scalar)) => vec![scalar],
        None => Vec::new(),
    }
}

fn comparison_symbol(op: Operator) -> &'static str {
    match op {
        Operator::Eq => "=",
        Operator::Neq => "!=",
        Operator::Gt => ">",
        Operator::Gte => ">=",
        Operator::Lt => "<",
        Operator::Lte => "<=",
        Operator::Contains => "CONTAINS",
        Operator::NotContains => "NOT CONTAINS",
        Operator::StartsWith => "STARTS WITH",
        Operator::EndsWith => "ENDS WITH",
        Operator::MatchesRegex => "MATCHES REGEX",
        other => other.as_str(),
    }
}

/// Bare identifiers stay bare, other strings are quoted
fn format_value(value: &ScalarValue) -> String {
    match value {
        ScalarValue::Text(s) if is_bare(s) => s.clone(),
        ScalarValue::Text(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}

fn is_bare(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}
