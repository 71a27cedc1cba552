//! Unified error handling
//!
//! [`AppError`] is the application error enum used by every handler and
//! service. Its [`IntoResponse`] impl maps each variant to an HTTP status and
//! the `{ "error": string }` wire shape. Internal details are logged via
//! `tracing` and never leak to the client.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::capacity::CapacityError;

/// Application error enum.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Caller mistake (400). Message is safe to surface.
    #[error("{0}")]
    Validation(String),

    /// Resource does not exist (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The uploaded image is not a floor plan (400). Carries whatever the
    /// vision model said it detected instead.
    #[error("NOT_FLOOR_PLAN")]
    NotFloorPlan { detected_content: Option<String> },

    /// The vision backend failed (500). The upstream message is surfaced
    /// as-is so quota and rate-limit errors are visible to the caller.
    #[error("{0}")]
    Upstream(String),

    /// Unexpected internal failure (500). Logged, surfaced generically.
    #[error("internal server error")]
    Internal(String),
}

/// Error response body: `{ "error": "..." }`, plus the detected content for
/// floor-plan rejections.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(rename = "detectedContent", skip_serializing_if = "Option::is_none")]
    detected_content: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: msg,
                    detected_content: None,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: msg,
                    detected_content: None,
                },
            ),
            AppError::NotFloorPlan { detected_content } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "NOT_FLOOR_PLAN".to_string(),
                    detected_content,
                },
            ),
            AppError::Upstream(msg) => {
                error!(target: "vision", error = %msg, "Vision backend error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: msg,
                        detected_content: None,
                    },
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "internal server error".to_string(),
                        detected_content: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<CapacityError> for AppError {
    fn from(e: CapacityError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Validation(format!("invalid multipart request: {e}"))
    }
}
