//! Field catalog: the fields a rule may reference

use crate::ast::Operator;
use crate::error::{Result, RuleError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Type of a catalog field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    /// Numeric field
    Number,
    /// Free text
    String,
    /// True / false
    Boolean,
    /// Timestamp, compared as text
    Datetime,
    /// One of a fixed set of codes
    Enum,
    /// Multi-valued text field
    List,
}

impl FieldType {
    /// Wire name of the field type
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Number => "NUMBER",
            FieldType::String => "STRING",
            FieldType::Boolean => "BOOLEAN",
            FieldType::Datetime => "DATETIME",
            FieldType::Enum => "ENUM",
            FieldType::List => "LIST",
        }
    }

    /// Operators a condition on this field type may use
    pub fn allowed_operators(&self) -> &'static [Operator] {
        use Operator::*;
        match self {
            FieldType::Number => &[
                Eq, Neq, Gt, Gte, Lt, Lte, In, NotIn, Between, NotBetween, IsNull, IsNotNull,
            ],
            FieldType::Datetime => &[
                Eq, Neq, Gt, Gte, Lt, Lte, Between, NotBetween, IsNull, IsNotNull,
            ],
            FieldType::String => &[
                Eq,
                Neq,
                In,
                NotIn,
                IsNull,
                IsNotNull,
                IsEmpty,
                Contains,
                NotContains,
                StartsWith,
                EndsWith,
                MatchesRegex,
            ],
            FieldType::Boolean => &[Eq, Neq, IsNull, IsNotNull],
            FieldType::Enum => &[Eq, Neq, In, NotIn, IsNull, IsNotNull],
            FieldType::List => &[
                IsEmpty, Contains, NotContains, MemberOf, NotMemberOf, IsNull, IsNotNull,
            ],
        }
    }

    /// Type that condition values must have for this field.
    ///
    /// LIST fields hold text items, so their values are strings.
    pub fn value_type(&self) -> FieldType {
        match self {
            FieldType::List => FieldType::String,
            other => *other,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Dotted key referenced by conditions (e.g. `txn.amount`)
    #[serde(alias = "field_key")]
    pub field_key: String,

    /// Human readable label
    pub label: String,

    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDefinition {
    /// Create a new field definition
    pub fn new(field_key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field_key: field_key.into(),
            label: label.into(),
            field_type,
        }
    }
}

/// Lookup table of field definitions keyed by field key
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: HashMap<String, FieldDefinition>,
}

impl FieldCatalog {
    /// Build a catalog; a later definition with the same key replaces an earlier one
    pub fn new(definitions: impl IntoIterator<Item = FieldDefinition>) -> Self {
        let mut catalog = Self::default();
        catalog.extend(definitions);
        catalog
    }

    /// The built-in transaction catalog
    pub fn builtin() -> Self {
        Self::new([
            FieldDefinition::new("txn.amount", "Transaction Amount", FieldType::Number),
            FieldDefinition::new("txn.mcc", "Merchant Category", FieldType::Enum),
            FieldDefinition::new("card.present", "Card Present", FieldType::Boolean),
            FieldDefinition::new("txn.timestamp", "Transaction Timestamp", FieldType::Datetime),
            FieldDefinition::new("account.tags", "Account Tags", FieldType::List),
            FieldDefinition::new("txn.country", "Transaction Country", FieldType::String),
        ])
    }

    /// Add or replace definitions
    pub fn extend(&mut self, definitions: impl IntoIterator<Item = FieldDefinition>) {
        for definition in definitions {
            self.fields.insert(definition.field_key.clone(), definition);
        }
    }

    /// Look up a field
    pub fn get(&self, field_key: &str) -> Option<&FieldDefinition> {
        self.fields.get(field_key)
    }

    /// Look up a field, failing when it is unknown
    pub fn require(&self, field_key: &str) -> Result<&FieldDefinition> {
        self.get(field_key)
            .ok_or_else(|| RuleError::UnknownField(field_key.to_string()))
    }

    /// Check whether `operator` may be used on `field_key`
    pub fn is_operator_allowed(&self, field_key: &str, operator: Operator) -> Result<bool> {
        let field = self.require(field_key)?;
        Ok(field.field_type.allowed_operators().contains(&operator))
    }

    /// All definitions, sorted by field key
    pub fn fields(&self) -> Vec<&FieldDefinition> {
        let mut fields: Vec<&FieldDefinition> = self.fields.values().collect();
        fields.sort_by(|a, b| a.field_key.cmp(&b.field_key));
        fields
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the catalog has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
