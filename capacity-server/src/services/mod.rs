//! Long-lived services held by the server state.

pub mod monitor;
pub mod vision;

pub use monitor::{MonitorInterval, MonitorService, MonitorStatus};
pub use vision::{AnalysisResponse, VisionService};
