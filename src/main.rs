//! Mendako Chat - browser chat UI backed by a hosted LLM
//!
//! Serves a single chat page, forwards each conversation to Gemini and
//! decorates assistant replies with a mood-dependent mendako GIF.

mod api;
mod assets;
mod config;
mod conversation;
mod llm;
mod mood;
mod session;

use api::{create_router, AppState};
use assets::{AssetLibrary, FsAssetLoader};
use config::AppConfig;
use llm::{ChatService, GeminiService, LoggingService};
use session::SessionManager;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mendako_chat=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration; a missing API key stops startup here
    let config = AppConfig::from_env()
        .inspect_err(|e| tracing::error!(error = %e, "Invalid configuration"))?;

    let gemini = GeminiService::new(
        config.api_key.clone(),
        &config.model,
        config.base_url.as_deref(),
    )?;
    let chat: Arc<dyn ChatService> = Arc::new(LoggingService::new(Arc::new(gemini)));
    tracing::info!(model = %chat.model_id(), "LLM service initialized");

    // Decorative images are read once; missing files only disable that image
    let loader = FsAssetLoader::new(&config.asset_dir);
    let assets = AssetLibrary::preload(&loader, &config.profile.assets);
    tracing::info!(
        dir = %loader.root().display(),
        loaded = assets.len(),
        enabled = config.profile.assets.len(),
        layout = ?config.profile.layout,
        mood_detection = config.profile.mood_detection,
        "Assets loaded"
    );

    if assets.is_empty() {
        tracing::warn!("No assets loaded; replies render as text only");
    }

    let state = AppState::new(SessionManager::new(chat, Arc::new(assets), config.profile));
    state.sessions.spawn_reaper(config.session_idle_timeout);
    tracing::info!(
        idle_timeout_secs = config.session_idle_timeout.as_secs(),
        "Idle session reaper started"
    );

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state).layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(compression),
    );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Mendako chat listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
