//! Candidate scoring for engine output.
//!
//! The retrieval engine returns passages in relevance order but without
//! per-passage scores. [`RankDecayScorer`] assigns a deterministic score from
//! the rank: `max(floor, top - decay * rank)`. It sits behind the
//! [`CandidateScorer`] trait so a similarity-based scorer can replace it
//! without touching the filter/rank pipeline.

use crate::config;
use crate::record::{CandidateRecord, MetadataValue};
use std::collections::HashMap;

/// Provenance carried into every record's metadata.
#[derive(Debug, Clone, Copy)]
pub struct QueryContext<'a> {
    /// The originating query text.
    pub query: &'a str,
    /// The resolved knowledge base id.
    pub knowledge_id: &'a str,
}

/// Converts ordered raw passages into scored candidate records.
pub trait CandidateScorer: Send + Sync {
    /// Produce one record per non-blank block, in input order.
    fn score(&self, blocks: &[String], ctx: &QueryContext<'_>) -> Vec<CandidateRecord>;
}

/// Linear rank decay with a floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankDecayScorer {
    /// Score of rank 0.
    pub top: f64,
    /// Score lost per rank.
    pub decay: f64,
    /// Minimum score.
    pub floor: f64,
}

impl Default for RankDecayScorer {
    fn default() -> Self {
        Self {
            top: config::TOP_RANK_SCORE,
            decay: config::RANK_SCORE_DECAY,
            floor: config::RANK_SCORE_FLOOR,
        }
    }
}

impl RankDecayScorer {
    /// Score for the zero-based `rank` among kept passages, quantized to
    /// [`config::SCORE_DECIMALS`] places and clamped into `[0.0, 1.0]`.
    pub fn score_at(&self, rank: usize) -> f64 {
        let raw = (self.top - self.decay * rank as f64).max(self.floor);
        let scale = 10f64.powi(config::SCORE_DECIMALS);
        ((raw * scale).round() / scale).clamp(0.0, 1.0)
    }
}

impl CandidateScorer for RankDecayScorer {
    fn score(&self, blocks: &[String], ctx: &QueryContext<'_>) -> Vec<CandidateRecord> {
        blocks
            .iter()
            .enumerate()
            .filter_map(|(position, block)| {
                let content = block.trim();
                (!content.is_empty()).then_some((position, content))
            })
            // Decay counts kept passages only, not raw positions: a dropped
            // blank does not cost the next passage a tier. Titles keep the raw position.
            .enumerate()
            .map(|(rank, (position, content))| {
                CandidateRecord::new(
                    content,
                    self.score_at(rank),
                    synthetic_title(position),
                    provenance(ctx),
                )
            })
            .collect()
    }
}

/// `Document_<n>`, 1-indexed by position in the raw engine output.
pub fn synthetic_title(position: usize) -> String {
    format!("{}{}", config::SYNTHETIC_TITLE_PREFIX, position + 1)
}

fn provenance(ctx: &QueryContext<'_>) -> HashMap<String, MetadataValue> {
    HashMap::from([
        (
            config::META_KNOWLEDGE_ID.to_string(),
            MetadataValue::from(ctx.knowledge_id),
        ),
        (config::META_QUERY.to_string(), MetadataValue::from(ctx.query)),
    ])
}
