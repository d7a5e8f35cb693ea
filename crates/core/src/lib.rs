//! # extknowledge-core
//!
//! Post-retrieval pipeline for external knowledge retrieval: turns the ordered
//! passages returned by a retrieval engine into scored records, applies a flat
//! metadata filter, a score threshold, and top-k truncation.
//!
//! This crate has no async or HTTP dependencies; the server crate owns the
//! engine call and the REST surface.

/// Global constants: retrieval limits, scoring tiers, and server defaults.
pub mod config;
/// Metadata filter types: logical and comparison operators, conditions.
pub mod filter_types;
/// Candidate record and metadata value types.
pub mod record;
/// Scoring, metadata filtering, and the filter-and-rank pipeline.
pub mod search;

pub use filter_types::{ComparisonOperator, LogicalOperator, MetadataCondition, MetadataFilter};
pub use record::{CandidateRecord, MetadataValue};
pub use search::pipeline::{filter_and_rank, RetrievalSettings, SettingsError};
pub use search::scorer::{CandidateScorer, QueryContext, RankDecayScorer};
