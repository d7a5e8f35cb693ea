//! Knowledge base registry.
//!
//! Maps caller-facing knowledge base ids to the store that serves them.
//! Unknown ids fall back to the store registered as `default`, when present.

use extknowledge_core::config;
use std::collections::HashMap;

/// A resolvable knowledge store: its id and the engine endpoint serving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeStore {
    pub id: String,
    pub endpoint: String,
}

impl KnowledgeStore {
    pub fn new(id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// Immutable after startup; shared across requests.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBaseRegistry {
    stores: HashMap<String, KnowledgeStore>,
}

impl KnowledgeBaseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry; later entries with the same id replace earlier ones.
    pub fn from_stores(stores: impl IntoIterator<Item = KnowledgeStore>) -> Self {
        let mut registry = Self::new();
        for store in stores {
            registry.insert(store);
        }
        registry
    }

    pub fn insert(&mut self, store: KnowledgeStore) {
        self.stores.insert(store.id.clone(), store);
    }

    /// Resolve `id`, falling back to the `default` store for unknown ids.
    pub fn resolve(&self, id: &str) -> Option<&KnowledgeStore> {
        if let Some(store) = self.stores.get(id) {
            return Some(store);
        }
        let fallback = self.stores.get(config::DEFAULT_KNOWLEDGE_BASE)?;
        tracing::warn!(
            knowledge_id = %id,
            fallback = config::DEFAULT_KNOWLEDGE_BASE,
            "Unknown knowledge base, using default"
        );
        Some(fallback)
    }

    pub fn has_default(&self) -> bool {
        self.stores.contains_key(config::DEFAULT_KNOWLEDGE_BASE)
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.stores.keys().cloned().collect();
        ids.sort();
        ids
    }
}
