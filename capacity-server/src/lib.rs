//! Capacity Server - venue capacity planning and crowd monitoring
//!
//! # Overview
//!
//! HTTP service for event organizers:
//!
//! - **Capacity calculation** (`capacity`): tiered occupancy capacities with
//!   exit-throughput caps and a fixed safety correction
//! - **Floor-plan analysis** (`services::vision`): Gemini vision pass-through
//!   that estimates booths, zones and total area from an uploaded plan
//! - **Crowd monitoring** (`services::monitor`): simulated occupancy sessions
//!   driven by cancellable periodic tasks
//!
//! # Module structure
//!
//! ```text
//! capacity-server/src/
//! ├── core/          # Config, state, server
//! ├── api/           # HTTP routes and handlers
//! ├── capacity/      # Occupancy math (pure)
//! ├── services/      # Vision client, monitor registry
//! └── utils/         # Errors, logging
//! ```

pub mod api;
pub mod capacity;
pub mod core;
pub mod services;
pub mod utils;

// Re-export public types
pub use capacity::{CalculationInput, CalculationResult, CapacityLevels, VenueType};
pub use core::{Config, Server, ServerState, build_app};
pub use services::{MonitorInterval, MonitorService, VisionService};
pub use utils::{AppError, AppResult};

// Re-export logger setup
pub use utils::logger::init_logger;
