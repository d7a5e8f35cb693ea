//! Retrieval engine seam.
//!
//! The engine turns `(query, knowledge store, requested count)` into an
//! ordered list of raw passages. Two implementations ship with the server:
//! [`LightRagEngine`] (HTTP, LightRAG-compatible `/query` endpoint) and
//! [`StaticEngine`] (in-memory passages loaded from a JSON fixture).

/// In-memory engine backed by a fixture map.
pub mod fixture;
/// HTTP client for LightRAG-compatible retrieval servers.
pub mod lightrag;

pub use fixture::StaticEngine;
pub use lightrag::LightRagEngine;

use crate::registry::KnowledgeStore;
use async_trait::async_trait;
use extknowledge_core::config;

/// Failure of a single engine call. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("engine returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("engine response could not be decoded: {0}")]
    Decode(String),
    #[error("fixture could not be loaded: {0}")]
    Fixture(String),
}

/// External retrieval engine queried once per request.
#[async_trait]
pub trait RetrievalEngine: Send + Sync {
    /// Ordered raw passages for `query` against `store`, most relevant first.
    async fn query(
        &self,
        query: &str,
        store: &KnowledgeStore,
        requested_count: usize,
    ) -> Result<Vec<String>, EngineError>;

    /// Short engine name for health reports and logs.
    fn name(&self) -> &'static str;
}

/// Split engine context text into passages on blank-line boundaries.
///
/// Blank segments are kept; the scorer drops them so that synthetic titles
/// still reflect the position in the raw context.
pub fn split_context(context: &str) -> Vec<String> {
    if context.is_empty() {
        return Vec::new();
    }
    context
        .replace("\r\n", "\n")
        .split(config::CONTEXT_SEPARATOR)
        .map(str::to_string)
        .collect()
}
