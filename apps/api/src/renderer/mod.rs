//! Bubble renderer: the seam to the service that draws the chat-quote bubble.
//!
//! The handler only sees the `BubbleRenderer` trait. The production backend is
//! `QuoteApiRenderer`, which talks to a quote rendering service over HTTP.

use async_trait::async_trait;
use image::RgbaImage;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::quote::message::Message;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Renderer error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Renderer returned an undecodable image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("{0}")]
    Failed(String),
}

/// Everything the renderer needs to draw one bubble.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub background_color_one: &'a str,
    pub background_color_two: &'a str,
    pub message: &'a Message,
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub emoji_style: &'a str,
}

/// Carried in `AppState` as `Arc<dyn BubbleRenderer>`.
#[async_trait]
pub trait BubbleRenderer: Send + Sync {
    async fn render(&self, request: &RenderRequest<'_>) -> Result<RgbaImage, RenderError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteApiRequest<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    format: &'a str,
    background_color: String,
    width: u32,
    height: u32,
    scale: u32,
    emoji_brand: &'a str,
    messages: [&'a Message; 1],
}

impl<'a> QuoteApiRequest<'a> {
    fn from_render(request: &RenderRequest<'a>) -> Self {
        Self {
            kind: "quote",
            format: "png",
            background_color: background_color_param(
                request.background_color_one,
                request.background_color_two,
            ),
            width: request.width,
            height: request.height,
            scale: request.scale,
            emoji_brand: request.emoji_style,
            messages: [request.message],
        }
    }
}

/// Renders bubbles through a quote rendering service's `/generate.png` endpoint.
#[derive(Clone)]
pub struct QuoteApiRenderer {
    client: Client,
    endpoint: String,
    token: String,
}

impl QuoteApiRenderer {
    pub fn new(base_url: &str, token: String) -> Result<Self, RenderError> {
        Ok(Self {
            client: Client::builder()
                .user_agent(concat!("quote-api/", env!("CARGO_PKG_VERSION")))
                .build()?,
            endpoint: format!("{}/generate.png", base_url.trim_end_matches('/')),
            token,
        })
    }
}

#[async_trait]
impl BubbleRenderer for QuoteApiRenderer {
    async fn render(&self, request: &RenderRequest<'_>) -> Result<RgbaImage, RenderError> {
        let body = QuoteApiRequest::from_render(request);

        let mut call = self.client.post(&self.endpoint).json(&body);
        if !self.token.is_empty() {
            call = call.bearer_auth(&self.token);
        }

        let response = call.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RenderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(RenderError::Failed("Renderer returned an empty body".into()));
        }
        let bubble = image::load_from_memory(&bytes)?.to_rgba8();

        debug!(
            "Renderer produced {}x{} bubble ({} bytes)",
            bubble.width(),
            bubble.height(),
            bytes.len()
        );

        Ok(bubble)
    }
}

/// The quote service takes a single color, or `one/two` for a gradient.
fn background_color_param(one: &str, two: &str) -> String {
    if one.eq_ignore_ascii_case(two) {
        one.to_string()
    } else {
        format!("{one}/{two}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_message() -> Message {
        serde_json::from_value(json!({
            "from": { "id": 1, "name": "Ada" },
            "text": "hello",
            "avatar": true
        }))
        .unwrap()
    }

    #[test]
    fn test_background_color_param_collapses_equal_colors() {
        assert_eq!(background_color_param("#303030", "#303030"), "#303030");
        assert_eq!(background_color_param("#303030", "#FFFFFF"), "#303030/#FFFFFF");
    }

    #[test]
    fn test_request_body_shape() {
        let message = sample_message();
        let request = RenderRequest {
            background_color_one: "#303030",
            background_color_two: "#303030",
            message: &message,
            width: 512,
            height: 512,
            scale: 2,
            emoji_style: "apple",
        };

        let body = serde_json::to_value(QuoteApiRequest::from_render(&request)).unwrap();
        assert_eq!(body["type"], "quote");
        assert_eq!(body["format"], "png");
        assert_eq!(body["backgroundColor"], "#303030");
        assert_eq!(body["width"], 512);
        assert_eq!(body["scale"], 2);
        assert_eq!(body["emojiBrand"], "apple");
        assert_eq!(body["messages"][0]["text"], "hello");
        assert_eq!(body["messages"][0]["from"]["name"], "Ada");
        assert_eq!(body["messages"][0]["avatar"], true);
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let renderer = QuoteApiRenderer::new("http://localhost:3000/", String::new()).unwrap();
        assert_eq!(renderer.endpoint, "http://localhost:3000/generate.png");
    }
}
