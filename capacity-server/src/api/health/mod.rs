//! Health check route
//!
//! | Path | Method | Purpose |
//! |------|--------|---------|
//! | /health | GET | Liveness, version, uptime |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    /// Seconds since the server state was built at startup
    uptime_seconds: u64,
    /// Registered monitoring sessions
    monitor_sessions: usize,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        uptime_seconds: state.uptime_seconds(),
        monitor_sessions: state.monitor.len(),
    })
}
