//! Retrieval service: registry resolution, one engine call, then the core
//! filter-and-rank pipeline.

use crate::engine::{EngineError, RetrievalEngine};
use crate::registry::KnowledgeBaseRegistry;
use extknowledge_core::{
    filter_and_rank, CandidateRecord, CandidateScorer, MetadataFilter, QueryContext,
    RankDecayScorer, RetrievalSettings,
};
use std::sync::Arc;

/// Request-scoped failures surfaced to the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("knowledge base '{0}' not found")]
    KnowledgeBaseNotFound(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Shared, immutable retrieval pipeline.
pub struct RetrievalService {
    registry: KnowledgeBaseRegistry,
    engine: Arc<dyn RetrievalEngine>,
    scorer: Arc<dyn CandidateScorer>,
}

impl RetrievalService {
    /// Creates a service scoring passages with [`RankDecayScorer`].
    pub fn new(registry: KnowledgeBaseRegistry, engine: Arc<dyn RetrievalEngine>) -> Self {
        Self::with_scorer(registry, engine, Arc::new(RankDecayScorer::default()))
    }

    pub fn with_scorer(
        registry: KnowledgeBaseRegistry,
        engine: Arc<dyn RetrievalEngine>,
        scorer: Arc<dyn CandidateScorer>,
    ) -> Self {
        Self {
            registry,
            engine,
            scorer,
        }
    }

    pub fn registry(&self) -> &KnowledgeBaseRegistry {
        &self.registry
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Retrieve, score, filter and truncate passages for one request.
    ///
    /// Unknown ids resolve to the `default` store when one exists; otherwise
    /// the engine is never called.
    pub async fn retrieve(
        &self,
        knowledge_id: &str,
        query: &str,
        settings: &RetrievalSettings,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<CandidateRecord>, RetrievalError> {
        let store = self
            .registry
            .resolve(knowledge_id)
            .ok_or_else(|| RetrievalError::KnowledgeBaseNotFound(knowledge_id.to_string()))?;

        tracing::info!(
            knowledge_id = %knowledge_id,
            store = %store.id,
            top_k = settings.top_k(),
            score_threshold = settings.score_threshold(),
            filtered = filter.is_some(),
            "Executing retrieval"
        );

        let blocks = self
            .engine
            .query(query, store, settings.top_k())
            .await
            .map_err(|e| {
                tracing::error!(store = %store.id, engine = self.engine.name(), error = %e, "Engine call failed");
                e
            })?;

        let ctx = QueryContext {
            query,
            knowledge_id: &store.id,
        };
        let candidates = self.scorer.score(&blocks, &ctx);
        Ok(filter_and_rank(candidates, settings, filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StaticEngine;
    use crate::registry::KnowledgeStore;
    use async_trait::async_trait;
    use extknowledge_core::{ComparisonOperator, LogicalOperator, MetadataCondition, MetadataValue};
    use std::collections::HashMap;

    struct FailingEngine;

    #[async_trait]
    impl RetrievalEngine for FailingEngine {
        async fn query(
            &self,
            _query: &str,
            _store: &KnowledgeStore,
            _requested_count: usize,
        ) -> Result<Vec<String>, EngineError> {
            Err(EngineError::Status {
                status: 503,
                body: "embedding provider unavailable".into(),
            })
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn static_engine() -> Arc<StaticEngine> {
        Arc::new(StaticEngine::new(HashMap::from([
            (
                "default".to_string(),
                ["Intro text", "", "Detail text", "More text", "Fifth", "Sixth"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            ("docs".to_string(), vec!["Docs passage".to_string()]),
        ])))
    }

    fn registry_with_default() -> KnowledgeBaseRegistry {
        KnowledgeBaseRegistry::from_stores([
            KnowledgeStore::new("default", "fixture://default"),
            KnowledgeStore::new("docs", "fixture://docs"),
        ])
    }

    #[tokio::test]
    async fn test_retrieve_scenario() {
        let service = RetrievalService::new(registry_with_default(), static_engine());
        let settings = RetrievalSettings::new(3, 0.5).unwrap();
        let records = service
            .retrieve("default", "intro", &settings, None)
            .await
            .unwrap();
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Document_1", "Document_3", "Document_4"]);
        assert_eq!(records[0].metadata["query"], MetadataValue::from("intro"));
    }

    #[tokio::test]
    async fn test_unknown_id_uses_default_store() {
        let service = RetrievalService::new(registry_with_default(), static_engine());
        let records = service
            .retrieve("AAA-BBB-CCC", "q", &RetrievalSettings::default(), None)
            .await
            .unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(
            records[0].metadata["knowledge_id"],
            MetadataValue::from("default")
        );
    }

    #[tokio::test]
    async fn test_unknown_id_without_default_skips_engine() {
        let engine = static_engine();
        let registry = KnowledgeBaseRegistry::from_stores([KnowledgeStore::new("docs", "fixture://docs")]);
        let service = RetrievalService::new(registry, engine.clone());
        let err = service
            .retrieve("missing", "q", &RetrievalSettings::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::KnowledgeBaseNotFound(ref id) if id == "missing"));
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_engine_failure_propagates() {
        let service = RetrievalService::new(registry_with_default(), Arc::new(FailingEngine));
        let err = service
            .retrieve("default", "q", &RetrievalSettings::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::Engine(EngineError::Status { status: 503, .. })));
        assert!(err.to_string().contains("embedding provider unavailable"));
    }

    #[tokio::test]
    async fn test_filter_on_provenance_metadata() {
        let service = RetrievalService::new(registry_with_default(), static_engine());
        let filter = MetadataFilter {
            logical_operator: LogicalOperator::And,
            conditions: vec![MetadataCondition::new(
                &["knowledge_id"],
                ComparisonOperator::Is,
                Some("docs"),
            )],
        };
        let from_docs = service
            .retrieve("docs", "q", &RetrievalSettings::default(), Some(&filter))
            .await
            .unwrap();
        let from_default = service
            .retrieve("default", "q", &RetrievalSettings::default(), Some(&filter))
            .await
            .unwrap();
        assert_eq!(from_docs.len(), 1);
        assert!(from_default.is_empty());
    }
}
