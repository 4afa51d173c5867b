mod background;
mod config;
mod errors;
mod quote;
mod renderer;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::background::HttpBackground;
use crate::config::Config;
use crate::renderer::QuoteApiRenderer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Quote API v{}", env!("CARGO_PKG_VERSION"));

    if config.token.is_empty() {
        warn!("TOKEN is not set; renderer requests will be sent without credentials");
    }

    // Both collaborators are built once and shared read-only across requests.
    let renderer = QuoteApiRenderer::new(&config.renderer_url, config.token.clone())?;
    info!("Renderer client initialized ({})", config.renderer_url);

    let background = HttpBackground::new(config.background_image_url.clone())?;
    info!("Background source: {}", config.background_image_url);

    let state = AppState {
        renderer: Arc::new(renderer),
        background: Arc::new(background),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Quote generator listening on http://{addr}/quote/generate");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
