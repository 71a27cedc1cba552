//! Capacity domain model
//!
//! Pure occupancy math for event venues:
//!
//! - [`VenueType`] - enumerated venue layouts and their density tables
//! - [`calculate`] - the capacity calculator (theoretical max, congestion
//!   levels, exit throughput, safety correction)
//! - [`CapacityLevels`] - the five congestion-level capacities, shared with
//!   the monitoring service

mod calculator;
mod venue;

pub use calculator::{
    CalculationDetails, CalculationInput, CalculationResult, CapacityLevels, CapacityVerdict,
    EchoedInput, calculate,
};
pub use venue::VenueType;

/// Errors from the capacity calculator.
///
/// Both are caller mistakes and surface as HTTP 400.
#[derive(Debug, thiserror::Error)]
pub enum CapacityError {
    #[error("a positive totalArea is required")]
    InvalidArea,

    #[error("unknown venue type: {0:?}")]
    UnknownVenueType(String),
}
