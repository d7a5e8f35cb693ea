//! Global configuration constants for extknowledge.
//!
//! Request limits, scoring parameters and server defaults are defined here.
//! Runtime configuration (keys, engine endpoints) is handled via CLI arguments
//! and environment variables in the server crate.

/// Smallest accepted `top_k`.
pub const MIN_TOP_K: usize = 1;

/// Largest accepted `top_k`.
pub const MAX_TOP_K: usize = 100;

/// Lower bound of the score threshold range.
pub const MIN_SCORE_THRESHOLD: f64 = 0.0;

/// Upper bound of the score threshold range.
pub const MAX_SCORE_THRESHOLD: f64 = 1.0;

/// Score given to the first passage returned by the engine.
pub const TOP_RANK_SCORE: f64 = 1.0;

/// Score lost per rank position by the rank-decay scorer.
pub const RANK_SCORE_DECAY: f64 = 0.1;

/// Floor of the rank-decay scorer. Positions 5 and beyond all receive this score.
pub const RANK_SCORE_FLOOR: f64 = 0.5;

/// Decimal places kept on computed scores, so `1.0 - 0.1 * 3` is exactly `0.7`.
pub const SCORE_DECIMALS: i32 = 6;

/// Prefix of synthetic record titles (`Document_1`, `Document_2`, ...).
pub const SYNTHETIC_TITLE_PREFIX: &str = "Document_";

/// Registry key of the fallback knowledge base.
pub const DEFAULT_KNOWLEDGE_BASE: &str = "default";

/// Metadata key carrying the resolved knowledge base id on every record.
pub const META_KNOWLEDGE_ID: &str = "knowledge_id";

/// Metadata key carrying the originating query on every record.
pub const META_QUERY: &str = "query";

/// Separator between passages in engine context text.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Default `top_k` when a caller omits it.
pub const DEFAULT_TOP_K: usize = 5;

/// Default score threshold when a caller omits it.
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.5;

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default retrieval mode sent to LightRAG-compatible engines.
pub const DEFAULT_QUERY_MODE: &str = "hybrid";

/// Timeout in seconds for a single engine call.
pub const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 30;

/// Per-request timeout in seconds. Must exceed the engine timeout.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Maximum HTTP request body size in bytes (1 MB).
pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Maximum number of concurrent in-flight requests.
pub const MAX_CONCURRENT_REQUESTS: usize = 256;

/// Maximum query length in bytes.
pub const MAX_QUERY_LEN: usize = 32_768;

/// Maximum number of conditions in one metadata filter.
pub const MAX_FILTER_CONDITIONS: usize = 64;


/// Minimum digit count for a bare integer to be read as Unix seconds
/// (`100000000` is 1973-03-03). Shorter values such as `2024` are not dates.
pub const MIN_EPOCH_DIGITS: usize = 9;
