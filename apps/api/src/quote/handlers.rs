//! Axum route handler for quote generation.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::quote::compositor::{composite, encode_png};
use crate::quote::message::Message;
use crate::quote::wrap::{wrap_text, DEFAULT_LINE_LENGTH};
use crate::quote::{BUBBLE_COLOR, EMOJI_STYLE, RENDER_HEIGHT, RENDER_SCALE, RENDER_WIDTH};
use crate::renderer::RenderRequest;
use crate::state::AppState;

/// POST /quote/generate
///
/// Validate → render bubble → fetch background → composite → PNG.
/// Renderer and background are awaited in that order; any failure ends the request.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<Message>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(mut message) = payload.map_err(reject_payload)?;
    message.validate()?;

    message.text = Value::String(wrap_text(message.text_str(), DEFAULT_LINE_LENGTH));

    let bubble = state
        .renderer
        .render(&RenderRequest {
            background_color_one: BUBBLE_COLOR,
            background_color_two: BUBBLE_COLOR,
            message: &message,
            width: RENDER_WIDTH,
            height: RENDER_HEIGHT,
            scale: RENDER_SCALE,
            emoji_style: EMOJI_STYLE,
        })
        .await?;

    let background = state.background.fetch().await?;

    // Resizing and PNG encoding are CPU-bound; keep them off the async executor.
    let (png, layout) = tokio::task::spawn_blocking(move || {
        let (canvas, layout) = composite(&bubble, &background);
        encode_png(&canvas).map(|png| (png, layout))
    })
    .await
    .map_err(|e| {
        AppError::Internal(anyhow::anyhow!("spawn_blocking failed in compositing: {e}"))
    })??;

    info!(
        "Quote generated ({}x{}), bubble centered",
        layout.canvas_width, layout.canvas_height
    );

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

/// Oversized bodies keep their 413; every other extraction failure is a bad payload.
fn reject_payload(rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(rejection.body_text())
    }
}
