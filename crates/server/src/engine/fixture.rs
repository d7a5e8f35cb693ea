//! Static engine serving fixed passages per knowledge base.
//!
//! Used for offline development (`--fixture`) and tests. The fixture file is
//! a JSON object mapping knowledge base ids to ordered passage lists.

use super::{EngineError, RetrievalEngine};
use crate::registry::KnowledgeStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory engine. Unknown stores yield no passages.
#[derive(Debug, Default)]
pub struct StaticEngine {
    passages: HashMap<String, Vec<String>>,
    calls: AtomicUsize,
}

impl StaticEngine {
    pub fn new(passages: HashMap<String, Vec<String>>) -> Self {
        Self {
            passages,
            calls: AtomicUsize::new(0),
        }
    }

    /// Loads `{"kb_id": ["passage", ...], ...}` from disk.
    pub fn from_json_file(path: &Path) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Fixture(format!("{}: {}", path.display(), e)))?;
        let passages: HashMap<String, Vec<String>> = serde_json::from_str(&raw)
            .map_err(|e| EngineError::Fixture(format!("{}: {}", path.display(), e)))?;
        Ok(Self::new(passages))
    }

    /// Knowledge base ids present in the fixture, sorted.
    pub fn knowledge_base_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.passages.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of queries served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RetrievalEngine for StaticEngine {
    async fn query(
        &self,
        _query: &str,
        store: &KnowledgeStore,
        _requested_count: usize,
    ) -> Result<Vec<String>, EngineError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.passages.get(&store.id).cloned().unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
