//! Filter-and-rank pipeline.
//!
//! Reduces scored candidates to the final response list in a fixed order:
//! metadata filter, then score threshold, then top-k truncation. Every stage
//! is a stable filter over the incoming order; nothing is re-sorted.

use crate::config;
use crate::filter_types::MetadataFilter;
use crate::record::CandidateRecord;
use crate::search::filter::apply_metadata_filter;

/// Rejected retrieval settings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("top_k must be {min}-{max}, got {0}", min = config::MIN_TOP_K, max = config::MAX_TOP_K)]
    TopKOutOfRange(usize),
    #[error(
        "score_threshold must be {min}-{max}, got {0}",
        min = config::MIN_SCORE_THRESHOLD,
        max = config::MAX_SCORE_THRESHOLD
    )]
    ThresholdOutOfRange(f64),
}

/// Validated `top_k` and `score_threshold` for one retrieval call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalSettings {
    top_k: usize,
    score_threshold: f64,
}

impl RetrievalSettings {
    /// Validates `top_k` ∈ [1, 100] and `score_threshold` ∈ [0.0, 1.0].
    pub fn new(top_k: usize, score_threshold: f64) -> Result<Self, SettingsError> {
        if !(config::MIN_TOP_K..=config::MAX_TOP_K).contains(&top_k) {
            return Err(SettingsError::TopKOutOfRange(top_k));
        }
        if !(config::MIN_SCORE_THRESHOLD..=config::MAX_SCORE_THRESHOLD).contains(&score_threshold) {
            return Err(SettingsError::ThresholdOutOfRange(score_threshold));
        }
        Ok(Self {
            top_k,
            score_threshold,
        })
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn score_threshold(&self) -> f64 {
        self.score_threshold
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: config::DEFAULT_TOP_K,
            score_threshold: config::DEFAULT_SCORE_THRESHOLD,
        }
    }
}

/// Run the metadata filter, score threshold and top-k truncation.
///
/// Records scoring strictly below the threshold are dropped; the first
/// `top_k` survivors are returned in their incoming order.
pub fn filter_and_rank(
    candidates: Vec<CandidateRecord>,
    settings: &RetrievalSettings,
    filter: Option<&MetadataFilter>,
) -> Vec<CandidateRecord> {
    let candidate_count = candidates.len();

    let filtered = apply_metadata_filter(candidates, filter);
    let filtered_count = filtered.len();

    let mut ranked: Vec<CandidateRecord> = filtered
        .into_iter()
        .filter(|record| record.score >= settings.score_threshold)
        .collect();
    let above_threshold = ranked.len();

    ranked.truncate(settings.top_k);

    tracing::debug!(
        candidates = candidate_count,
        after_filter = filtered_count,
        after_threshold = above_threshold,
        returned = ranked.len(),
        top_k = settings.top_k,
        score_threshold = settings.score_threshold,
        "Filter-and-rank completed"
    );
    ranked
}
