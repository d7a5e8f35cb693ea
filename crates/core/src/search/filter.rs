//! Metadata filtering engine for retrieval results.
//!
//! Evaluates [`MetadataFilter`](crate::filter_types::MetadataFilter) predicates
//! against record metadata. Conditions are combined with the filter's logical
//! operator; within a condition every listed field must satisfy the operator.
//!
//! Field values are compared through their string form. `=` and `≠` parse both
//! sides as numbers and fall back to string comparison; the ordering operators
//! (`>`, `<`, `≥`, `≤`, `before`, `after`) have no fallback and evaluate to
//! false when either side does not parse.

use crate::config;
use crate::filter_types::{ComparisonOperator, LogicalOperator, MetadataCondition, MetadataFilter};
use crate::record::{CandidateRecord, MetadataValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Check if a record's metadata matches the given filter.
///
/// `and` requires every condition to hold, `or` at least one. With no
/// conditions `and` matches everything and `or` matches nothing.
pub fn matches_filter(metadata: &HashMap<String, MetadataValue>, filter: &MetadataFilter) -> bool {
    let mut results = filter
        .conditions
        .iter()
        .map(|cond| evaluate_condition(metadata, cond));
    match filter.logical_operator {
        LogicalOperator::And => results.all(|r| r),
        LogicalOperator::Or => results.any(|r| r),
    }
}

/// Keep the records whose metadata matches `filter`, preserving order.
///
/// A missing filter or an empty record list is returned unchanged.
pub fn apply_metadata_filter(
    records: Vec<CandidateRecord>,
    filter: Option<&MetadataFilter>,
) -> Vec<CandidateRecord> {
    let Some(filter) = filter else {
        return records;
    };
    if records.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| matches_filter(&record.metadata, filter))
        .collect()
}

/// Evaluate one condition. Every listed field must exist and satisfy the
/// operator; the first missing or failing field short-circuits to false.
pub fn evaluate_condition(
    metadata: &HashMap<String, MetadataValue>,
    cond: &MetadataCondition,
) -> bool {
    let operand = cond.value.as_deref().unwrap_or("");
    for field in &cond.fields {
        let field_value = match metadata.get(field) {
            Some(v) => v.to_string(),
            None => return false,
        };
        if !field_satisfies(&field_value, cond.operator, operand) {
            return false;
        }
    }
    true
}

fn field_satisfies(field: &str, op: ComparisonOperator, operand: &str) -> bool {
    match op {
        ComparisonOperator::Contains => field.contains(operand),
        ComparisonOperator::NotContains => !field.contains(operand),
        ComparisonOperator::StartWith => field.starts_with(operand),
        ComparisonOperator::EndWith => field.ends_with(operand),
        ComparisonOperator::Is => field == operand,
        ComparisonOperator::IsNot => field != operand,
        ComparisonOperator::Empty => field.is_empty(),
        ComparisonOperator::NotEmpty => !field.is_empty(),
        ComparisonOperator::Equal => numeric_eq(field, operand).unwrap_or(field == operand),
        ComparisonOperator::NotEqual => numeric_eq(field, operand).map_or(field != operand, |eq| !eq),
        ComparisonOperator::GreaterThan => numeric_cmp(field, operand) == Some(Ordering::Greater),
        ComparisonOperator::LessThan => numeric_cmp(field, operand) == Some(Ordering::Less),
        ComparisonOperator::GreaterEqual => {
            matches!(numeric_cmp(field, operand), Some(Ordering::Greater | Ordering::Equal))
        }
        ComparisonOperator::LessEqual => {
            matches!(numeric_cmp(field, operand), Some(Ordering::Less | Ordering::Equal))
        }
        ComparisonOperator::Before => temporal_cmp(field, operand) == Some(Ordering::Less),
        ComparisonOperator::After => temporal_cmp(field, operand) == Some(Ordering::Greater),
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// `None` when either side is not a number.
fn numeric_eq(field: &str, operand: &str) -> Option<bool> {
    Some(parse_number(field)? == parse_number(operand)?)
}

/// `None` when either side is not a number, or either is NaN.
fn numeric_cmp(field: &str, operand: &str) -> Option<Ordering> {
    parse_number(field)?.partial_cmp(&parse_number(operand)?)
}

fn temporal_cmp(field: &str, operand: &str) -> Option<Ordering> {
    Some(parse_timestamp(field)?.cmp(&parse_timestamp(operand)?))
}

/// Parse RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD` (midnight UTC), or
/// Unix seconds written with at least [`config::MIN_EPOCH_DIGITS`] digits.
/// Shorter integers such as a bare year are not timestamps.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }
    if s.len() < config::MIN_EPOCH_DIGITS || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}
