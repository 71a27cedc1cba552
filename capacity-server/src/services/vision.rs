//! Floor-plan analysis via the Gemini vision REST API.
//!
//! The image is sent inline (base64) together with a fixed prompt asking the
//! model to decide whether the image is a floor plan and, if so, to estimate
//! booth count, empty-space ratio, entrances, zones and total area as bare
//! JSON. The reply is coerced into [`AnalysisResponse`].
//!
//! Two mock modes support offline development and tests:
//! - `USE_MOCK_DATA=true` returns a canned analysis without calling the API
//! - `MOCK_ERROR=quota` simulates a quota-exhausted upstream failure

use std::time::Duration;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::core::Config;
use crate::utils::{AppError, AppResult};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default booth footprint (3 m x 3 m) used when the caller does not supply one.
pub const DEFAULT_BOOTH_SIZE_M2: f64 = 9.0;

const ANALYSIS_PROMPT: &str = r#"First decide whether this image is an event/exhibition floor plan.

If it is NOT a floor plan (a photo of a person, landscape, food, animal, or any ordinary photograph), answer:
{
  "isFloorPlan": false,
  "detectedContent": "what the image actually shows (e.g. a cat, a food photo, scenery)"
}

If it IS a floor plan, analyze:
1. Booth count (numbered booths such as P1, P2, S1, S2)
2. Ratio of aisles and empty space (a value between 0 and 1)
3. Number of entrances/exits
4. Zone divisions
5. Notable features (stage, lounge, etc.)
6. Estimate the total venue area in square meters using any dimensions or
   scale shown on the plan.
   - If dimensions are marked, calculate from them
   - Otherwise estimate from the standard booth size (3m x 3m = 9 sqm)
   - Estimate the overall width x depth of the space

Answer with this JSON only:
{
  "isFloorPlan": true,
  "boothCount": number,
  "emptySpaceRatio": decimal between 0 and 1,
  "entranceCount": number,
  "zones": ["Zone 1", "Zone 2"],
  "features": ["Conference Stage", "Open Lounge"],
  "analysis": "short analysis summary",
  "estimatedDimensions": {
    "width": width in meters,
    "height": depth in meters
  },
  "estimatedTotalArea": estimated total area in sqm,
  "areaCalculationMethod": "how the area was derived (plan dimensions, booth-size estimate, ...)"
}"#;

/// Estimated venue dimensions reported by the model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EstimatedDimensions {
    pub width: f64,
    pub height: f64,
}

/// Raw analysis as parsed from the model reply. Every field is defaulted so a
/// partially-shaped reply still parses; `isFloorPlan` defaults to true since
/// rejections always set it explicitly.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPlanAnalysis {
    #[serde(default = "default_true")]
    pub is_floor_plan: bool,
    #[serde(default)]
    pub detected_content: Option<String>,
    #[serde(default)]
    pub booth_count: u32,
    #[serde(default)]
    pub empty_space_ratio: f64,
    #[serde(default)]
    pub entrance_count: u32,
    #[serde(default)]
    pub zones: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub estimated_dimensions: Option<EstimatedDimensions>,
    #[serde(default)]
    pub estimated_total_area: Option<f64>,
    #[serde(default)]
    pub area_calculation_method: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Analysis result returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub is_floor_plan: bool,
    pub booth_count: u32,
    pub empty_space_ratio: f64,
    pub entrance_count: u32,
    pub zones: Vec<String>,
    pub features: Vec<String>,
    pub analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_dimensions: Option<EstimatedDimensions>,
    pub booth_size: f64,
    pub estimated_booth_area: f64,
    pub estimated_total_area: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_calculation_method: Option<String>,
}

// ========== Gemini wire types ==========

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Vision analysis client.
#[derive(Debug, Clone)]
pub struct VisionService {
    client: reqwest::Client,
    api_key: String,
    model: String,
    use_mock: bool,
    mock_error: Option<String>,
}

impl VisionService {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.vision_timeout_ms))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: config.google_ai_api_key.clone(),
            model: config.gemini_model.clone(),
            use_mock: config.use_mock_analysis,
            mock_error: config.mock_analysis_error.clone(),
        }
    }

    /// Analyze a floor-plan image.
    ///
    /// `mime` is the uploaded content type, `booth_size` the per-booth
    /// footprint in m² used for booth-area figures and the fallback total.
    pub async fn analyze(
        &self,
        mime: &str,
        image: &[u8],
        booth_size: f64,
    ) -> AppResult<AnalysisResponse> {
        if self.mock_error.as_deref() == Some("quota") {
            tracing::info!("Mock mode: simulating quota-exhausted error");
            tokio::time::sleep(Duration::from_secs(1)).await;
            return Err(AppError::Upstream(
                "429 Resource has been exhausted (quota)".to_string(),
            ));
        }

        if self.use_mock {
            tracing::info!("Mock mode: returning sample analysis");
            // Roughly the latency of a real analysis call
            tokio::time::sleep(Duration::from_millis(1500)).await;
            return Ok(build_response(mock_analysis(), booth_size));
        }

        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let analysis = self.call_gemini(mime, &encoded).await?;

        if !analysis.is_floor_plan {
            tracing::info!(
                detected = analysis.detected_content.as_deref().unwrap_or("unknown"),
                "Uploaded image is not a floor plan"
            );
            return Err(AppError::NotFloorPlan {
                detected_content: analysis.detected_content,
            });
        }

        tracing::info!(
            booths = analysis.booth_count,
            entrances = analysis.entrance_count,
            area = ?analysis.estimated_total_area,
            "Floor plan analyzed"
        );
        Ok(build_response(analysis, booth_size))
    }

    async fn call_gemini(&self, mime: &str, image_b64: &str) -> AppResult<FloorPlanAnalysis> {
        let url = format!("{GEMINI_API_BASE}/{}:generateContent", self.model);
        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    { "inline_data": { "mime_type": mime, "data": image_b64 } },
                    { "text": ANALYSIS_PROMPT },
                ]
            }]
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("vision request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("{status} {detail}")));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("invalid vision response: {e}")))?;

        let text = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| AppError::Upstream("vision response contained no content".into()))?;

        parse_analysis_reply(&text)
    }
}

/// Parse the model's reply text into a [`FloorPlanAnalysis`].
///
/// The model is asked for bare JSON but frequently wraps it in ```json fences.
fn parse_analysis_reply(text: &str) -> AppResult<FloorPlanAnalysis> {
    let json = strip_code_fence(text);
    serde_json::from_str(json)
        .map_err(|e| AppError::Upstream(format!("unparseable vision reply: {e}")))
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

/// Combine the raw analysis with the booth size into the response shape,
/// deriving the total area from booths when the model could not estimate one.
fn build_response(analysis: FloorPlanAnalysis, booth_size: f64) -> AnalysisResponse {
    let estimated_booth_area = f64::from(analysis.booth_count) * booth_size;
    let estimated_total_area = match analysis.estimated_total_area {
        Some(area) if area > 0.0 => area,
        _ => fallback_total_area(estimated_booth_area, analysis.empty_space_ratio),
    };

    AnalysisResponse {
        is_floor_plan: true,
        booth_count: analysis.booth_count,
        empty_space_ratio: analysis.empty_space_ratio,
        entrance_count: analysis.entrance_count,
        zones: analysis.zones,
        features: analysis.features,
        analysis: analysis.analysis,
        estimated_dimensions: analysis.estimated_dimensions,
        booth_size,
        estimated_booth_area,
        estimated_total_area,
        area_calculation_method: analysis.area_calculation_method,
    }
}

/// Booth area scaled up by the empty-space ratio. The ratio is clamped below
/// 1.0 so a degenerate "all empty" reply cannot divide by zero.
fn fallback_total_area(booth_area: f64, empty_space_ratio: f64) -> f64 {
    let occupied = 1.0 - empty_space_ratio.clamp(0.0, 0.95);
    (booth_area / occupied).round()
}

/// Canned analysis for local testing (`USE_MOCK_DATA=true`).
fn mock_analysis() -> FloorPlanAnalysis {
    FloorPlanAnalysis {
        is_floor_plan: true,
        detected_content: None,
        booth_count: 24,
        empty_space_ratio: 0.35,
        entrance_count: 3,
        zones: vec!["Zone A".into(), "Zone B".into(), "Zone C".into()],
        features: vec![
            "Main stage".into(),
            "Information desk".into(),
            "Rest lounge".into(),
        ],
        analysis: "[MOCK] Exhibition floor plan with 24 booths across 3 zones.".into(),
        estimated_dimensions: Some(EstimatedDimensions {
            width: 50.0,
            height: 40.0,
        }),
        estimated_total_area: Some(2000.0),
        area_calculation_method: Some("[MOCK] Sample data for testing".into()),
    }
}
