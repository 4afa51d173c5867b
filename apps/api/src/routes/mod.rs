pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::quote::handlers;
use crate::state::AppState;

/// Largest accepted JSON body.
pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/quote/generate", post(handlers::handle_generate))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use image::{DynamicImage, Rgba, RgbaImage};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::background::{BackgroundSource, FetchError};
    use crate::renderer::{BubbleRenderer, RenderError, RenderRequest};

    /// Returns a solid bubble and remembers the last request it saw.
    #[derive(Default)]
    struct StubRenderer {
        fail_with: Option<String>,
        seen_text: Mutex<Option<String>>,
        seen_style: Mutex<Option<(String, u32, u32, u32)>>,
    }

    #[async_trait]
    impl BubbleRenderer for StubRenderer {
        async fn render(&self, request: &RenderRequest<'_>) -> Result<RgbaImage, RenderError> {
            *self.seen_text.lock().unwrap() = request.message.text.as_str().map(str::to_string);
            *self.seen_style.lock().unwrap() = Some((
                request.emoji_style.to_string(),
                request.width,
                request.height,
                request.scale,
            ));
            match &self.fail_with {
                Some(msg) => Err(RenderError::Failed(msg.clone())),
                None => Ok(RgbaImage::from_pixel(100, 40, Rgba([48, 48, 48, 255]))),
            }
        }
    }

    struct StubBackground {
        fail: bool,
    }

    #[async_trait]
    impl BackgroundSource for StubBackground {
        async fn fetch(&self) -> Result<DynamicImage, FetchError> {
            if self.fail {
                return Err(FetchError::Status {
                    status: 404,
                    url: "http://cdn.test/bg.jpg".to_string(),
                });
            }
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                64,
                96,
                Rgba([200, 180, 160, 255]),
            )))
        }
    }

    fn router_with(renderer: Arc<StubRenderer>, background_fails: bool) -> Router {
        build_router(AppState {
            renderer,
            background: Arc::new(StubBackground {
                fail: background_fails,
            }),
        })
    }

    async fn post_json(router: Router, body: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri("/quote/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        router.oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_empty_object_is_rejected() {
        let router = router_with(Arc::new(StubRenderer::default()), false);
        let response = post_json(router, "{}").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Invalid message payload" })
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let router = router_with(Arc::new(StubRenderer::default()), false);
        let response = post_json(router, "{not json").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid message payload");
    }

    #[tokio::test]
    async fn test_oversized_body_is_413() {
        let renderer = Arc::new(StubRenderer::default());
        let router = router_with(renderer.clone(), false);
        let body = json!({ "from": "A", "text": "a".repeat(BODY_LIMIT_BYTES) }).to_string();
        let response = post_json(router, &body).await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(response).await["error"], "Request body too large");
        assert!(renderer.seen_text.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_text_never_reaches_renderer() {
        let renderer = Arc::new(StubRenderer::default());
        let router = router_with(renderer.clone(), false);
        let response = post_json(router, r#"{"from":"A"}"#).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(renderer.seen_text.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_valid_message_returns_png() {
        let router = router_with(Arc::new(StubRenderer::default()), false);
        let response = post_json(router, r#"{"from":"A","text":"hello"}"#).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(!bytes.is_empty());
        let decoded = image::load_from_memory(&bytes).unwrap();
        // 100x40 bubble, padding = 20 on both axes.
        assert_eq!((decoded.width(), decoded.height()), (120, 60));
    }

    #[tokio::test]
    async fn test_renderer_receives_wrapped_text_and_fixed_style() {
        let renderer = Arc::new(StubRenderer::default());
        let router = router_with(renderer.clone(), false);
        let text = "this sentence is definitely long enough that it must wrap onto two lines";
        let body = json!({ "from": { "name": "Ada" }, "text": text }).to_string();

        let response = post_json(router, &body).await;
        assert_eq!(response.status(), StatusCode::OK);

        let seen = renderer.seen_text.lock().unwrap().clone().unwrap();
        assert!(seen.contains('\n'));
        assert!(seen.lines().all(|l| l.chars().count() <= 45));
        assert_eq!(
            renderer.seen_style.lock().unwrap().clone(),
            Some(("apple".to_string(), 512, 512, 2))
        );
    }

    #[tokio::test]
    async fn test_renderer_failure_is_500_with_details() {
        let renderer = Arc::new(StubRenderer {
            fail_with: Some("renderer exploded".to_string()),
            ..Default::default()
        });
        let router = router_with(renderer, false);
        let response = post_json(router, r#"{"from":"A","text":"hello"}"#).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Failed to generate quote", "details": "renderer exploded" })
        );
    }

    #[tokio::test]
    async fn test_background_failure_is_500() {
        let router = router_with(Arc::new(StubRenderer::default()), true);
        let response = post_json(router, r#"{"from":"A","text":"hello"}"#).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Failed to generate quote");
        assert!(body["details"].as_str().unwrap().contains("404"));
    }

    #[tokio::test]
    async fn test_health() {
        let router = router_with(Arc::new(StubRenderer::default()), false);
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }
}
