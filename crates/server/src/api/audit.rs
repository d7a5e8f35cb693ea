//! Structured audit logging for retrieval requests.
//!
//! Provides [`AuditContext`] (inserted by auth middleware into request extensions)
//! and [`audit_event`] for emitting structured audit log entries with `target: "audit"`.
//! Operators can filter/route audit events via `RUST_LOG=audit=info`.

/// Caller identity for audit logging.
///
/// Inserted into request extensions by the auth middleware for every
/// protected route. Handlers extract it via `Option<Extension<AuditContext>>`.
#[derive(Clone, Debug)]
pub struct AuditContext {
    /// Masked API key prefix (first 8 chars + "...") or "anonymous".
    pub key_prefix: String,
    /// Client IP from `X-Forwarded-For` / `X-Real-IP` headers, or "-".
    pub client_ip: String,
}

/// Mask an API key for safe logging: first 8 chars + "...".
pub fn mask_key(token: &str) -> String {
    match token.char_indices().nth(8) {
        Some((idx, _)) => format!("{}...", &token[..idx]),
        None => "***".to_string(),
    }
}

/// Extract client IP from request headers (X-Forwarded-For → X-Real-IP → "-").
pub fn extract_client_ip(headers: &axum::http::HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| "-".to_string())
}

/// Emit a structured audit log entry.
pub fn audit_event(ctx: &AuditContext, action: &str, resource: &str, detail: &str, outcome: &str) {
    tracing::info!(
        target: "audit",
        actor = %ctx.key_prefix,
        client_ip = %ctx.client_ip,
        action = %action,
        resource = %resource,
        detail = %detail,
        outcome = %outcome,
        "audit"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    #[test]
    fn test_mask_key_long_token() {
        assert_eq!(mask_key("sk-abcdefghijklmnop"), "sk-abcde...");
    }

    #[test]
    fn test_mask_key_exactly_9_chars() {
        assert_eq!(mask_key("123456789"), "12345678...");
    }

    #[test]
    fn test_mask_key_short_token() {
        assert_eq!(mask_key("12345678"), "***");
        assert_eq!(mask_key(""), "***");
    }

    #[test]
    fn test_mask_key_multibyte() {
        assert_eq!(mask_key("ключключключ"), "ключключ...");
    }

    #[test]
    fn test_extract_ip_x_forwarded_for_chain() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1, 10.0.0.2"));
        headers.insert("x-real-ip", HeaderValue::from_static("192.168.1.1"));
        assert_eq!(extract_client_ip(&headers), "10.0.0.1");
    }

    #[test]
    fn test_extract_ip_x_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("192.168.1.1"));
        assert_eq!(extract_client_ip(&headers), "192.168.1.1");
    }

    #[test]
    fn test_extract_ip_no_headers_returns_dash() {
        assert_eq!(extract_client_ip(&HeaderMap::new()), "-");
    }

    #[test]
    fn test_audit_event_does_not_panic() {
        let ctx = AuditContext {
            key_prefix: "anonymous".into(),
            client_ip: "-".into(),
        };
        audit_event(&ctx, "retrieval", "default", "top_k=5", "success");
    }
}
