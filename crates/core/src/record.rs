//! Candidate record types.
//!
//! A `CandidateRecord` is one retrieved passage with its relevance score,
//! provenance title and metadata. `MetadataValue` supports boolean, integer,
//! float, and string values for use in metadata filter conditions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A scalar metadata value attached to a record.
///
/// Serialized untagged, so it maps one-to-one onto JSON scalars. Filter
/// conditions compare against the [`Display`](fmt::Display) form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Boolean value (`true` / `false`).
    Boolean(bool),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating-point number.
    Float(f64),
    /// UTF-8 string.
    String(String),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Boolean(b) => write!(f, "{b}"),
            MetadataValue::Integer(i) => write!(f, "{i}"),
            // Whole floats keep their fractional digit: 2.0 prints as "2.0", not "2".
            MetadataValue::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{v:.1}")
            }
            MetadataValue::Float(v) => write!(f, "{v}"),
            MetadataValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::String(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::String(s)
    }
}

impl From<i64> for MetadataValue {
    fn from(i: i64) -> Self {
        MetadataValue::Integer(i)
    }
}

impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        MetadataValue::Float(v)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Boolean(b)
    }
}

/// A retrieved passage before final filtering and truncation.
///
/// Records are immutable once built: pipeline stages produce new lists and
/// never edit a record in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Passage text, trimmed.
    pub content: String,
    /// Relevance score in `[0.0, 1.0]`.
    pub score: f64,
    /// Provenance label.
    pub title: String,
    /// Arbitrary key-value metadata for filtering.
    #[serde(default)]
    pub metadata: HashMap<String, MetadataValue>,
}

impl CandidateRecord {
    /// Creates a record, clamping `score` into `[0.0, 1.0]`. NaN scores become `0.0`.
    pub fn new(
        content: impl Into<String>,
        score: f64,
        title: impl Into<String>,
        metadata: HashMap<String, MetadataValue>,
    ) -> Self {
        let score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        };
        Self {
            content: content.into(),
            score,
            title: title.into(),
            metadata,
        }
    }
}
