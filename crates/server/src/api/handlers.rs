//! HTTP request handlers and shared application state.

use crate::api::audit::{audit_event, AuditContext};
use crate::api::errors::ApiError;
use crate::api::metrics;
use crate::api::models::*;
use crate::service::{RetrievalError, RetrievalService};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use extknowledge_core::{config, MetadataFilter, RetrievalSettings};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state passed to every handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RetrievalService>,
    /// Accepted bearer keys. Empty means authentication is disabled.
    pub api_keys: Arc<Vec<String>>,
    pub prometheus_handle: PrometheusHandle,
    pub start_time: Instant,
}

fn validate_filter(filter: &MetadataFilter) -> Result<(), ApiError> {
    if filter.conditions.len() > config::MAX_FILTER_CONDITIONS {
        return Err(ApiError::BadRequest(format!(
            "metadata_condition exceeds maximum of {} conditions",
            config::MAX_FILTER_CONDITIONS
        )));
    }
    if filter.conditions.iter().any(|c| c.fields.is_empty()) {
        return Err(ApiError::BadRequest(
            "metadata_condition.conditions[].name must list at least one field".into(),
        ));
    }
    Ok(())
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry = state.service.registry();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "External Knowledge API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        engine: state.service.engine_name().to_string(),
        engine_ready: !registry.is_empty(),
        knowledge_bases: registry.ids(),
    })
}

/// `POST /retrieval`
pub async fn retrieval(
    State(state): State<AppState>,
    audit_ctx: Option<Extension<AuditContext>>,
    payload: Result<Json<RetrievalRequest>, JsonRejection>,
) -> Result<Json<RetrievalResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if req.knowledge_id.trim().is_empty() {
        return Err(ApiError::BadRequest("knowledge_id must not be empty".into()));
    }
    if req.query.len() > config::MAX_QUERY_LEN {
        return Err(ApiError::BadRequest(format!(
            "query exceeds maximum of {} bytes",
            config::MAX_QUERY_LEN
        )));
    }
    let settings = RetrievalSettings::new(
        req.retrieval_setting.top_k,
        req.retrieval_setting.score_threshold,
    )
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if let Some(ref filter) = req.metadata_condition {
        validate_filter(filter)?;
    }

    let filtered = req.metadata_condition.is_some();
    let start = Instant::now();
    let result = state
        .service
        .retrieve(
            &req.knowledge_id,
            &req.query,
            &settings,
            req.metadata_condition.as_ref(),
        )
        .await;

    let records = match result {
        Ok(records) => records,
        Err(err) => {
            let kind = match err {
                RetrievalError::KnowledgeBaseNotFound(_) => "not_found",
                RetrievalError::Engine(_) => "engine",
            };
            metrics::record_retrieval_failure(kind);
            if let Some(Extension(ref ctx)) = audit_ctx {
                audit_event(ctx, "retrieval", &req.knowledge_id, &err.to_string(), "failure");
            }
            tracing::warn!(knowledge_id = %req.knowledge_id, error = %err, "Retrieval failed");
            return Err(err.into());
        }
    };

    let count = records.len();
    metrics::record_retrieval(filtered, count, start.elapsed());
    if let Some(Extension(ref ctx)) = audit_ctx {
        audit_event(
            ctx,
            "retrieval",
            &req.knowledge_id,
            &format!("top_k={},results={}", settings.top_k(), count),
            "success",
        );
    }
    tracing::info!(knowledge_id = %req.knowledge_id, top_k = settings.top_k(), results = count, "Retrieval completed");

    Ok(Json(RetrievalResponse {
        records: records.into_iter().map(RecordResponse::from).collect(),
    }))
}

/// `GET /metrics`
pub async fn metrics_endpoint(State(state): State<AppState>) -> String {
    state.prometheus_handle.render()
}
