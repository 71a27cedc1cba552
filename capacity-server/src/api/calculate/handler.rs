use axum::Json;

use crate::capacity::{self, CalculationInput, CalculationResult};
use crate::utils::AppResult;

/// Run the capacity calculation for a venue.
///
/// Stateless pass-through to [`capacity::calculate`]; invalid input surfaces
/// as 400 with a descriptive message.
pub async fn calculate(Json(input): Json<CalculationInput>) -> AppResult<Json<CalculationResult>> {
    let result = capacity::calculate(&input)?;

    tracing::info!(
        total_area = input.total_area,
        venue_type = %result.input.venue_type,
        recommended = result.result.recommended,
        maximum = result.result.maximum,
        bottleneck_risk = result.calculation.bottleneck_risk,
        "Capacity calculated"
    );

    Ok(Json(result))
}
