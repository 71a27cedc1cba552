//! Floor-plan analysis API
//!
//! | Path | Method | Purpose |
//! |------|--------|---------|
//! | /api/analyze | POST | Analyze an uploaded floor-plan image (multipart) |

mod handler;

use axum::{Router, extract::DefaultBodyLimit, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/analyze", post(handler::analyze))
        // Uploads up to the 5MB image cap plus multipart overhead
        .layer(DefaultBodyLimit::max(6 * 1024 * 1024))
}
