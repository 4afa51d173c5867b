use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::background::FetchError;
use crate::renderer::RenderError;

const INVALID_PAYLOAD: &str = "Invalid message payload";
const PAYLOAD_TOO_LARGE: &str = "Request body too large";
const GENERATION_FAILED: &str = "Failed to generate quote";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// `Validation` is a 400 and `PayloadTooLarge` a 413. Everything else collapses
/// into the same 500 body; the variant only decides what gets logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid message payload: {0}")]
    Validation(String),

    #[error("Request body exceeds the size limit")]
    PayloadTooLarge,

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("PNG encoding failed: {0}")]
    Encoding(#[from] image::ImageError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(reason) => {
                tracing::debug!("Rejected quote request: {reason}");
                (StatusCode::BAD_REQUEST, json!({ "error": INVALID_PAYLOAD }))
            }
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                json!({ "error": PAYLOAD_TOO_LARGE }),
            ),
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, failure_body(&self))
            }
            AppError::Fetch(e) => {
                tracing::error!("Background fetch error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, failure_body(&self))
            }
            AppError::Encoding(e) => {
                tracing::error!("Encoding error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, failure_body(&self))
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, failure_body(&self))
            }
        };

        (status, Json(body)).into_response()
    }
}

fn failure_body(err: &AppError) -> serde_json::Value {
    json!({
        "error": GENERATION_FAILED,
        "details": err.to_string(),
    })
}
