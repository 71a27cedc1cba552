//! API route modules
//!
//! - [`health`] - health check
//! - [`calculate`] - capacity calculation
//! - [`analyze`] - floor-plan analysis
//! - [`monitor`] - crowd monitoring sessions

pub mod analyze;
pub mod calculate;
pub mod health;
pub mod monitor;
