//! HTTP API server
//!
//! Exposes the transformation pipeline, audio history and generated files
//! over axum.

pub mod handlers;
pub mod types;

pub use handlers::AppState;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::speech::{AudioStore, Synthesizer};

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = Arc::new(AudioStore::new(config.speech.audio_dir.clone()));
        let synthesizer = Synthesizer::from_config(&config.speech, store.clone())
            .context("Failed to set up speech synthesis")?;

        Ok(Self {
            store,
            synthesizer,
            history_limit: config.speech.history_limit,
        })
    }
}

/// Build the router. `static_dir` is mounted at `/static` when given.
pub fn router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/", get(handlers::index))
        .route("/transform", post(handlers::transform))
        .route("/history", get(handlers::history))
        .route("/api/status", get(handlers::status))
        .nest_service("/audio", ServeDir::new(state.store.dir()));

    if let Some(dir) = static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &Config) -> Result<()> {
    let state = Arc::new(AppState::from_config(config)?);
    if state.synthesizer.is_none() {
        tracing::info!("Speech synthesis disabled; serving text transformation only");
    }

    let static_dir = Some(config.server.static_dir.as_path()).filter(|d| d.is_dir());
    let app = router(state, static_dir);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
