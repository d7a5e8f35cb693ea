//! Post-retrieval primitives: candidate scoring, metadata filtering, and the
//! filter-and-rank pipeline that combines them.

/// Metadata filtering predicates for retrieval results.
pub mod filter;
/// Filter-and-rank orchestration and validated retrieval settings.
pub mod pipeline;
/// Rank-based scoring of raw engine passages.
pub mod scorer;

pub use filter::{apply_metadata_filter, evaluate_condition, matches_filter};
pub use pipeline::filter_and_rank;
