//! Metadata filter types for retrieval requests.
//!
//! A [`MetadataFilter`] is a flat list of [`MetadataCondition`]s joined by a
//! single [`LogicalOperator`]. Wire names follow the external knowledge API:
//! `name` for the field list and `comparison_operator` for the operator.

use serde::{Deserialize, Deserializer, Serialize};

/// How per-condition results are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    /// Every condition must hold.
    #[default]
    And,
    /// At least one condition must hold.
    Or,
}

/// Comparison operator for a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "not contains")]
    NotContains,
    #[serde(rename = "start with", alias = "starts with")]
    StartWith,
    #[serde(rename = "end with", alias = "ends with")]
    EndWith,
    #[serde(rename = "is")]
    Is,
    #[serde(rename = "is not")]
    IsNot,
    #[serde(rename = "empty")]
    Empty,
    #[serde(rename = "not empty")]
    NotEmpty,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "≠", alias = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "≥", alias = ">=")]
    GreaterEqual,
    #[serde(rename = "≤", alias = "<=")]
    LessEqual,
    #[serde(rename = "before")]
    Before,
    #[serde(rename = "after")]
    After,
}

/// A single predicate over one or more metadata fields.
///
/// Every listed field must be present and satisfy the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataCondition {
    #[serde(rename = "name", alias = "fields")]
    pub fields: Vec<String>,
    #[serde(rename = "comparison_operator", alias = "operator")]
    pub operator: ComparisonOperator,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub value: Option<String>,
}

impl MetadataCondition {
    pub fn new(fields: &[&str], operator: ComparisonOperator, value: Option<&str>) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            operator,
            value: value.map(str::to_string),
        }
    }
}

/// Metadata filter: conditions combined with one logical operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataFilter {
    #[serde(default)]
    pub logical_operator: LogicalOperator,
    pub conditions: Vec<MetadataCondition>,
}

/// Accepts a JSON string, number, boolean or null for a condition value.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "condition value must be a scalar, got {other}"
        ))),
    }
}
