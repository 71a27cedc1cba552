use std::sync::Arc;
use std::time::SystemTime;

use crate::core::Config;
use crate::services::{MonitorService, VisionService};

/// Server state - cheap-clone handle to every shared service.
///
/// | Field | Type | Purpose |
/// |-------|------|---------|
/// | config | Config | Immutable configuration |
/// | vision | VisionService | Gemini floor-plan analysis client |
/// | monitor | Arc<MonitorService> | Monitoring session registry |
/// | started_at | SystemTime | Process start, for uptime reporting |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub vision: VisionService,
    pub monitor: Arc<MonitorService>,
    pub started_at: SystemTime,
}

impl ServerState {
    /// Build the state from configuration.
    pub fn initialize(config: &Config) -> Self {
        Self {
            config: config.clone(),
            vision: VisionService::new(config),
            monitor: Arc::new(MonitorService::new()),
            started_at: SystemTime::now(),
        }
    }

    /// Whole seconds since the state was built.
    pub fn uptime_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(self.started_at)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
