use std::sync::Arc;

use crate::background::BackgroundSource;
use crate::renderer::BubbleRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable bubble renderer. Default: QuoteApiRenderer.
    pub renderer: Arc<dyn BubbleRenderer>,
    /// Background image source, re-fetched on every request.
    pub background: Arc<dyn BackgroundSource>,
}
