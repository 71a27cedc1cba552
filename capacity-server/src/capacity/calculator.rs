//! Capacity Calculator
//!
//! Closed-form occupancy math: given a venue's floor area, layout type,
//! entrance count and aisle width, produce the tiered congestion-level
//! capacities and a safety-corrected recommended/maximum headcount.
//!
//! Pure and stateless - identical input always yields identical output.

use serde::{Deserialize, Serialize};

use super::{CapacityError, VenueType};

/// Occupants a single entrance/exit can process (planning figure, midpoint
/// of the usual 250-300 range).
const PERSONS_PER_EXIT: u64 = 275;

/// Fire-code aisle throughput: persons served per meter of aisle width.
const AISLE_THROUGHPUT_PER_METER: f64 = 82.0;

/// Fixed safety correction applied to every published capacity (15% reduction).
const SAFETY_CORRECTION_FACTOR: f64 = 0.85;

/// Density ratios for congestion levels 1-5 relative to the standard density.
const LEVEL_RATIOS: [f64; 5] = [0.30, 0.50, 0.70, 0.90, 1.10];

/// Advisory attached to the result when the corrected maximum ends up below
/// the physical theoretical maximum.
const SAFETY_NOTE: &str =
    "Maximum occupancy was adjusted to account for exit throughput and safety margins.";

const DEFAULT_ENTRANCE_COUNT: u32 = 2;
const DEFAULT_AISLE_WIDTH_M: f64 = 2.0;

/// Calculation request body.
///
/// `venue_type` is kept as the raw string so an unrecognized value is
/// reported through [`CapacityError::UnknownVenueType`] instead of a generic
/// body-deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    /// Total floor area in m². Missing is treated as 0 and rejected.
    #[serde(default)]
    pub total_area: f64,
    #[serde(default)]
    pub venue_type: String,
    #[serde(default = "default_entrance_count")]
    pub entrance_count: u32,
    /// Main aisle width in meters.
    #[serde(default = "default_aisle_width")]
    pub aisle_width: f64,
}

fn default_entrance_count() -> u32 {
    DEFAULT_ENTRANCE_COUNT
}

fn default_aisle_width() -> f64 {
    DEFAULT_AISLE_WIDTH_M
}

/// Immutable calculation snapshot returned to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub input: EchoedInput,
    pub calculation: CalculationDetails,
    pub capacities: CapacityLevels,
    pub result: CapacityVerdict,
}

/// The request parameters as actually used (defaults applied, venue parsed).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoedInput {
    pub total_area: f64,
    pub venue_type: VenueType,
    pub entrance_count: u32,
    pub aisle_width: f64,
}

/// Intermediate values of the calculation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationDetails {
    /// m² per occupant for the venue type.
    pub space_per_person: f64,
    /// Physical maximum ignoring all safety factors.
    pub theoretical_max: u64,
    /// Occupants the entrances/exits can process.
    pub exit_capacity: u64,
    /// True when the theoretical max exceeds what the aisle width can serve.
    /// Informational only - it does not adjust recommended/maximum.
    pub bottleneck_risk: bool,
}

/// Safety-corrected occupant capacities for congestion levels 1 (safe)
/// through 5 (critical).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityLevels {
    pub level1: u64,
    pub level2: u64,
    pub level3: u64,
    pub level4: u64,
    pub level5: u64,
}

impl CapacityLevels {
    /// Congestion level (1-5) for a given headcount.
    pub fn level_for(&self, count: u64) -> u8 {
        if count <= self.level1 {
            1
        } else if count <= self.level2 {
            2
        } else if count <= self.level3 {
            3
        } else if count <= self.level4 {
            4
        } else {
            5
        }
    }

    /// Levels must not shrink as congestion increases.
    pub fn is_non_decreasing(&self) -> bool {
        self.level1 <= self.level2
            && self.level2 <= self.level3
            && self.level3 <= self.level4
            && self.level4 <= self.level5
    }
}

/// Final recommendation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityVerdict {
    pub recommended: u64,
    pub maximum: u64,
    /// Serialized as `null` when no adjustment advisory applies.
    pub safety_note: Option<String>,
}

/// Run the capacity calculation.
///
/// Fails with [`CapacityError::InvalidArea`] when `total_area` is missing,
/// non-finite or not positive, and [`CapacityError::UnknownVenueType`] when
/// the venue type is not one of the four enumerated layouts.
pub fn calculate(input: &CalculationInput) -> Result<CalculationResult, CapacityError> {
    if !input.total_area.is_finite() || input.total_area <= 0.0 {
        return Err(CapacityError::InvalidArea);
    }
    let venue_type: VenueType = input.venue_type.parse()?;

    let space_per_person = venue_type.space_per_person();
    let standard_density = venue_type.standard_density();

    // 1. Physical maximum, ignoring safety factors
    let theoretical_max = (input.total_area / space_per_person).floor() as u64;

    // 2. Congestion-level capacities as fractions of the standard density
    let raw_level = |ratio: f64| (input.total_area * standard_density * ratio).floor() as u64;
    let raw_levels = LEVEL_RATIOS.map(raw_level);

    // 3. Exit throughput
    let exit_capacity = u64::from(input.entrance_count) * PERSONS_PER_EXIT;

    // 4. Aisle bottleneck check
    let required_aisle_width = theoretical_max as f64 / AISLE_THROUGHPUT_PER_METER;
    let bottleneck_risk = required_aisle_width > input.aisle_width;

    // 5. Recommended at level 2 (comfortable), maximum at level 3 (congested),
    //    both capped by exit throughput
    let recommended = raw_levels[1].min(exit_capacity);
    let maximum = raw_levels[2].min(exit_capacity);

    // 6. Safety correction on everything published
    let corrected = |count: u64| (count as f64 * SAFETY_CORRECTION_FACTOR).floor() as u64;

    let capacities = CapacityLevels {
        level1: corrected(raw_levels[0]),
        level2: corrected(raw_levels[1]),
        level3: corrected(raw_levels[2]),
        level4: corrected(raw_levels[3]),
        level5: corrected(raw_levels[4]),
    };
    let recommended = corrected(recommended);
    let maximum = corrected(maximum);

    let safety_note = (maximum < theoretical_max).then(|| SAFETY_NOTE.to_string());

    Ok(CalculationResult {
        input: EchoedInput {
            total_area: input.total_area,
            venue_type,
            entrance_count: input.entrance_count,
            aisle_width: input.aisle_width,
        },
        calculation: CalculationDetails {
            space_per_person,
            theoretical_max,
            exit_capacity,
            bottleneck_risk,
        },
        capacities,
        result: CapacityVerdict {
            recommended,
            maximum,
            safety_note,
        },
    })
}
