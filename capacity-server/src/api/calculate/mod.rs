//! Capacity calculation API
//!
//! | Path | Method | Purpose |
//! |------|--------|---------|
//! | /api/calculate | POST | Tiered occupancy capacities for a venue |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/calculate", post(handler::calculate))
}
