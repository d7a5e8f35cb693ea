//! extknowledge-server: HTTP server for external knowledge retrieval.
//!
//! Resolves the knowledge base, queries the retrieval engine once, and runs
//! the `extknowledge-core` filter-and-rank pipeline on the returned passages.

/// REST API layer: Axum router, HTTP handlers, models, auth, metrics.
pub mod api;
/// Retrieval engine trait and its HTTP and fixture implementations.
pub mod engine;
/// Knowledge base id → store registry with default fallback.
pub mod registry;
/// Retrieval orchestration: resolve, query, score, filter and rank.
pub mod service;
/// CLI arguments and validated server settings.
pub mod settings;
