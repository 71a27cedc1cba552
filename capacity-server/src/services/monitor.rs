//! Simulated crowd monitoring sessions.
//!
//! Each session owns a periodic tick task that random-walks the current
//! headcount against the session's capacity levels, keeps a bounded history
//! and raises an alert from congestion level 3 upward. Sessions are stopped
//! through an explicit [`CancellationToken`]; a stopped session keeps its
//! last readings and stays queryable until it is stopped a second time.
//! The most recent sample wins, there are no ordering guarantees beyond
//! that.
//!
//! The counts are simulated data - a real deployment would feed gate-counter
//! events into the same session state instead of the random walk.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::capacity::CapacityLevels;
use crate::utils::{AppError, AppResult};

/// Samples kept per session.
const HISTORY_LIMIT: usize = 20;

/// Congestion level at which alerts start.
const ALERT_THRESHOLD: u8 = 3;

/// Per-tick variation range relative to the current count.
const VARIATION_MIN: f64 = -0.15;
const VARIATION_MAX: f64 = 0.20;

/// The simulated count may overshoot level 5 by 10%.
const OVERSHOOT_FACTOR: f64 = 1.1;

/// Reporting interval selected by the organizer. The demo pacing compresses
/// the nominal interval so a session is watchable in real time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitorInterval {
    #[default]
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "10min")]
    TenMinutes,
    #[serde(rename = "1hour")]
    OneHour,
}

impl MonitorInterval {
    /// Demo-mode tick period.
    pub fn demo_period(self) -> Duration {
        match self {
            MonitorInterval::OneMinute => Duration::from_secs(3),
            MonitorInterval::TenMinutes => Duration::from_secs(5),
            MonitorInterval::OneHour => Duration::from_secs(10),
        }
    }
}

/// One recorded sample.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Local wall-clock time of the sample (HH:MM:SS).
    pub time: String,
    pub count: u64,
    pub level: u8,
}

/// Raised while the congestion level is at or above the alert threshold.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorAlert {
    pub level: u8,
    pub message: String,
}

/// Session snapshot returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    pub session_id: Uuid,
    pub running: bool,
    pub current_count: u64,
    pub current_level: u8,
    pub capacities: CapacityLevels,
    /// `null` while the level is below the alert threshold.
    pub alert: Option<MonitorAlert>,
    pub history: Vec<HistoryEntry>,
}

/// Mutable sample state, guarded by a mutex inside the session.
struct SessionData {
    current_count: u64,
    history: VecDeque<HistoryEntry>,
    alert: Option<MonitorAlert>,
}

struct Session {
    capacities: CapacityLevels,
    data: Mutex<SessionData>,
    cancel: CancellationToken,
}

/// Registry of live monitoring sessions.
#[derive(Default)]
pub struct MonitorService {
    sessions: DashMap<Uuid, Arc<Session>>,
}

impl MonitorService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session and spawn its tick task.
    ///
    /// The initial count sits between level 2 and level 3 so the alerting
    /// path is exercised quickly; the first sample is taken immediately.
    pub fn start(
        &self,
        capacities: CapacityLevels,
        interval: MonitorInterval,
    ) -> AppResult<MonitorStatus> {
        if capacities.level5 == 0 {
            return Err(AppError::Validation(
                "capacities.level5 must be greater than zero".to_string(),
            ));
        }
        if !capacities.is_non_decreasing() {
            return Err(AppError::Validation(
                "capacity levels must be non-decreasing".to_string(),
            ));
        }

        let id = Uuid::new_v4();
        // Midpoint of level2..level3 without overflowing near u64::MAX
        let initial_count = capacities.level2 / 2
            + capacities.level3 / 2
            + (capacities.level2 % 2 + capacities.level3 % 2) / 2;
        let session = Arc::new(Session {
            capacities,
            data: Mutex::new(SessionData {
                current_count: initial_count,
                history: VecDeque::with_capacity(HISTORY_LIMIT),
                alert: None,
            }),
            cancel: CancellationToken::new(),
        });
        self.sessions.insert(id, session.clone());

        let period = interval.demo_period();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = session.cancel.cancelled() => break,
                    // First tick completes immediately: the start sample
                    _ = ticker.tick() => {
                        let mut data = session.data.lock();
                        step(&mut data, &session.capacities);
                    }
                }
            }
            tracing::debug!(session = %id, "Monitor session task stopped");
        });

        tracing::info!(session = %id, interval = ?interval, "Monitor session started");
        self.status(id)
    }

    /// Snapshot a session.
    pub fn status(&self, id: Uuid) -> AppResult<MonitorStatus> {
        let session = self
            .sessions
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("monitor session {id}")))?;
        let data = session.data.lock();

        Ok(MonitorStatus {
            session_id: id,
            running: !session.cancel.is_cancelled(),
            current_count: data.current_count,
            current_level: session.capacities.level_for(data.current_count),
            capacities: session.capacities,
            alert: data.alert.clone(),
            history: data.history.iter().cloned().collect(),
        })
    }

    /// Cancel a session's tick task.
    ///
    /// The stopped session stays in the registry with its last readings so
    /// organizers can still inspect it; stopping it a second time drops it.
    pub fn stop(&self, id: Uuid) -> AppResult<()> {
        // Clone out of the map entry so the shard lock is released before
        // a possible remove below
        let session = {
            let entry = self
                .sessions
                .get(&id)
                .ok_or_else(|| AppError::NotFound(format!("monitor session {id}")))?;
            Arc::clone(entry.value())
        };
        if session.cancel.is_cancelled() {
            self.sessions.remove(&id);
            tracing::info!(session = %id, "Monitor session removed");
        } else {
            session.cancel.cancel();
            tracing::info!(session = %id, "Monitor session stopped");
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Advance the random walk by one sample.
fn step(data: &mut SessionData, capacities: &CapacityLevels) {
    let variation =
        data.current_count as f64 * rand::thread_rng().gen_range(VARIATION_MIN..VARIATION_MAX);
    let ceiling = (capacities.level5 as f64 * OVERSHOOT_FACTOR).floor();
    let next = (data.current_count as f64 + variation)
        .round()
        .clamp(0.0, ceiling) as u64;

    data.current_count = next;
    let level = capacities.level_for(next);

    if data.history.len() == HISTORY_LIMIT {
        data.history.pop_front();
    }
    data.history.push_back(HistoryEntry {
        time: chrono::Local::now().format("%H:%M:%S").to_string(),
        count: next,
        level,
    });

    data.alert = (level >= ALERT_THRESHOLD).then(|| MonitorAlert {
        level,
        message: alert_message(level).to_string(),
    });
}

fn alert_message(level: u8) -> &'static str {
    match level {
        3 => "Congested. Slow down admissions.",
        4 => "Very congested! Restrict entry.",
        _ => "Critical density! Immediate crowd control required.",
    }
}
