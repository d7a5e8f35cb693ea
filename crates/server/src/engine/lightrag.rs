//! LightRAG-compatible HTTP engine client.
//!
//! Sends `POST {endpoint}/query` with `only_need_context: true` and splits the
//! returned context into passages. Each knowledge store's `endpoint` is the
//! base URL of its retrieval server.

use super::{split_context, EngineError, RetrievalEngine};
use crate::registry::KnowledgeStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request body of the `/query` endpoint.
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    mode: &'a str,
    top_k: usize,
    only_need_context: bool,
}

/// Response body of the `/query` endpoint.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    response: Option<String>,
}

/// HTTP engine with a shared connection pool.
pub struct LightRagEngine {
    client: reqwest::Client,
    mode: String,
}

impl LightRagEngine {
    /// Creates an engine using retrieval `mode` (e.g. `hybrid`) and a per-call timeout.
    pub fn new(mode: impl Into<String>, timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(EngineError::Transport)?;
        Ok(Self {
            client,
            mode: mode.into(),
        })
    }

    fn query_url(endpoint: &str) -> String {
        format!("{}/query", endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl RetrievalEngine for LightRagEngine {
    async fn query(
        &self,
        query: &str,
        store: &KnowledgeStore,
        requested_count: usize,
    ) -> Result<Vec<String>, EngineError> {
        let url = Self::query_url(&store.endpoint);
        let body = QueryRequest {
            query,
            mode: &self.mode,
            top_k: requested_count,
            only_need_context: true,
        };
        tracing::debug!(url = %url, mode = %self.mode, top_k = requested_count, "Querying engine");

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(EngineError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EngineError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: QueryResponse = resp
            .json()
            .await
            .map_err(|e| EngineError::Decode(e.to_string()))?;
        Ok(parsed.response.as_deref().map(split_context).unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "lightrag"
    }
}
