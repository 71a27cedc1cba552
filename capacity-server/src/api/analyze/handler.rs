//! Floor-plan upload handler.
//!
//! Accepts a multipart form with an `image` field (PNG/JPEG/WebP) and an
//! optional `boothSize` field, validates the image and hands it to the
//! vision service.

use axum::Json;
use axum::extract::{Multipart, State};

use crate::core::ServerState;
use crate::services::AnalysisResponse;
use crate::services::vision::DEFAULT_BOOTH_SIZE_M2;
use crate::utils::{AppError, AppResult};

/// Maximum image size (5MB)
const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

pub async fn analyze(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<AnalysisResponse>> {
    let mut image_data: Option<Vec<u8>> = None;
    let mut content_type: Option<String> = None;
    let mut booth_size = DEFAULT_BOOTH_SIZE_M2;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "image" => {
                content_type = field.content_type().map(str::to_string);
                image_data = Some(field.bytes().await?.to_vec());
            }
            "boothSize" => {
                booth_size = field
                    .text()
                    .await?
                    .trim()
                    .parse()
                    .ok()
                    .filter(|v: &f64| *v > 0.0)
                    .unwrap_or(DEFAULT_BOOTH_SIZE_M2);
            }
            _ => {}
        }
    }

    let data = image_data
        .ok_or_else(|| AppError::Validation("an image file is required".to_string()))?;

    if data.is_empty() {
        return Err(AppError::Validation("empty image provided".to_string()));
    }
    if data.len() > MAX_IMAGE_SIZE {
        return Err(AppError::Validation(format!(
            "image too large, maximum is {}MB",
            MAX_IMAGE_SIZE / 1024 / 1024
        )));
    }
    // Must decode as an actual image before anything is sent upstream
    image::load_from_memory(&data)
        .map_err(|e| AppError::Validation(format!("invalid image: {e}")))?;

    let mime = content_type.unwrap_or_else(|| "image/jpeg".to_string());

    tracing::info!(
        size = data.len(),
        mime = %mime,
        booth_size = booth_size,
        "Analyzing floor plan"
    );

    let result = state.vision.analyze(&mime, &data, booth_size).await?;
    Ok(Json(result))
}
