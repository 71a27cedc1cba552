//! Venue types and their fixed density tables.
//!
//! The tables are keyed by an enumerated variant rather than by string so an
//! unrecognized venue type is rejected at the boundary instead of silently
//! producing garbage numbers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CapacityError;

/// Venue layout classification.
///
/// Determines the occupancy density assumptions used by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueType {
    Standing,
    Banquet,
    Theater,
    Classroom,
}

impl VenueType {
    pub const ALL: [VenueType; 4] = [
        VenueType::Standing,
        VenueType::Banquet,
        VenueType::Theater,
        VenueType::Classroom,
    ];

    /// Floor area per occupant (m²).
    pub fn space_per_person(self) -> f64 {
        match self {
            VenueType::Standing => 0.5,
            // Banquet seating runs 1.3-1.9 m², use the average
            VenueType::Banquet => 1.5,
            // Theater seating runs 0.65-1.0 m², use the average
            VenueType::Theater => 0.8,
            VenueType::Classroom => 2.0,
        }
    }

    /// Standard density (occupants per m²) at full congestion baseline.
    pub fn standard_density(self) -> f64 {
        match self {
            VenueType::Standing => 2.0,
            VenueType::Banquet => 0.7,
            VenueType::Theater => 1.2,
            VenueType::Classroom => 0.5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VenueType::Standing => "standing",
            VenueType::Banquet => "banquet",
            VenueType::Theater => "theater",
            VenueType::Classroom => "classroom",
        }
    }
}

impl fmt::Display for VenueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VenueType {
    type Err = CapacityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standing" => Ok(VenueType::Standing),
            "banquet" => Ok(VenueType::Banquet),
            "theater" => Ok(VenueType::Theater),
            "classroom" => Ok(VenueType::Classroom),
            other => Err(CapacityError::UnknownVenueType(other.to_string())),
        }
    }
}
