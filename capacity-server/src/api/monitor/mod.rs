//! Crowd monitoring API
//!
//! | Path | Method | Purpose |
//! |------|--------|---------|
//! | /api/monitor/sessions | POST | Start a monitoring session |
//! | /api/monitor/sessions/{id} | GET | Session snapshot |
//! | /api/monitor/sessions/{id} | DELETE | Stop and remove a session |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/monitor", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/sessions", post(handler::start_session))
        .route(
            "/sessions/{id}",
            get(handler::session_status).delete(handler::stop_session),
        )
}
