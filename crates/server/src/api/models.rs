//! Request and response data transfer objects for the REST API.
//!
//! All types derive `Serialize` and/or `Deserialize` for JSON marshalling via Axum.

use extknowledge_core::{CandidateRecord, MetadataFilter, MetadataValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `retrieval_setting` object of a retrieval request.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalSettingRequest {
    pub top_k: usize,
    pub score_threshold: f64,
}

/// Request body for `POST /retrieval`.
#[derive(Debug, Deserialize)]
pub struct RetrievalRequest {
    pub knowledge_id: String,
    pub query: String,
    pub retrieval_setting: RetrievalSettingRequest,
    #[serde(default)]
    pub metadata_condition: Option<MetadataFilter>,
}

/// One record in a retrieval response.
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub content: String,
    pub score: f64,
    pub title: String,
    /// Serialized as plain JSON scalars (`MetadataValue` is untagged).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, MetadataValue>>,
}

impl From<CandidateRecord> for RecordResponse {
    fn from(record: CandidateRecord) -> Self {
        let metadata = (!record.metadata.is_empty()).then_some(record.metadata);
        Self {
            content: record.content,
            score: record.score,
            title: record.title,
            metadata,
        }
    }
}

/// Response body for `POST /retrieval`.
#[derive(Debug, Serialize)]
pub struct RetrievalResponse {
    pub records: Vec<RecordResponse>,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub engine: String,
    pub engine_ready: bool,
    pub knowledge_bases: Vec<String>,
}
