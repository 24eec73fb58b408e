//! Health check endpoint for container orchestration.

/// Health check handler.
///
/// Liveness only: returns "ok" whenever the process can answer HTTP. It does
/// not touch the database, so a service running in degraded lazy-pool mode
/// still reports healthy and keeps getting traffic (per-request errors are
/// the designed failure surface).
pub async fn health() -> &'static str {
    "ok"
}
