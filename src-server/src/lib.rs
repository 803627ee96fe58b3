//! Rivalwatch HTTP service
//!
//! Analyzes competitor text, marketing images and web pages through chat
//! models and keeps a short history of completed analyses.

pub mod commands;
pub mod config;
pub mod pipeline;
pub mod routes;
pub mod state;

pub use config::Settings;
pub use pipeline::{Pipeline, PipelineError};
pub use routes::create_router;
pub use state::AppState;

use std::net::SocketAddr;

use tracing::{info, warn};

/// Build state from settings and serve until the process is stopped
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let state = AppState::new(settings).await?;

    let client = state.pipeline.client();
    match client.text_provider() {
        Some((name, model)) => info!("Text analysis via {} (model: {})", name, model),
        None => warn!("No provider key configured, text analysis will fail"),
    }
    match client.vision_provider() {
        Some((name, model)) => info!("Image analysis via {} (model: {})", name, model),
        None => warn!("OPENAI_API_KEY not set, image analysis will fail"),
    }
    info!(
        "Extraction mode: {}, history: {} (max {} items)",
        state.pipeline.extractor().mode(),
        settings.history_file.display(),
        settings.max_history_items
    );

    let mut app = create_router(state);
    match &settings.frontend_dir {
        Some(dir) if dir.is_dir() => {
            info!("Serving frontend from {}", dir.display());
            app = routes::with_frontend(app, dir);
        }
        Some(dir) => warn!("Frontend directory {} not found, UI disabled", dir.display()),
        None => {}
    }

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
