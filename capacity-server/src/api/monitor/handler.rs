use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capacity::CapacityLevels;
use crate::core::ServerState;
use crate::services::{MonitorInterval, MonitorStatus};
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    /// Capacity levels from a prior /api/calculate run.
    pub capacities: CapacityLevels,
    #[serde(default)]
    pub interval: MonitorInterval,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopSessionResponse {
    pub session_id: Uuid,
    pub stopped: bool,
}

/// Start a simulated monitoring session.
pub async fn start_session(
    State(state): State<ServerState>,
    Json(request): Json<StartSessionRequest>,
) -> AppResult<Json<MonitorStatus>> {
    let status = state.monitor.start(request.capacities, request.interval)?;
    Ok(Json(status))
}

/// Snapshot the current count, level, alert and history of a session.
pub async fn session_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MonitorStatus>> {
    state.monitor.status(id).map(Json)
}

/// Cancel a session's periodic task. The stopped session remains
/// queryable with its last readings; a repeat call removes it.
pub async fn stop_session(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<StopSessionResponse>> {
    state.monitor.stop(id)?;
    Ok(Json(StopSessionResponse {
        session_id: id,
        stopped: true,
    }))
}
