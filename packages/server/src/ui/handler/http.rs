//! HTTP API endpoint handlers.

/// Liveness endpoint
pub async fn health_check() -> &'static str {
    "ok"
}
