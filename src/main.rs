use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use music_recommender::{
    catalog::CatalogStore,
    config::Config,
    routes::{create_router, AppState},
    services::{
        providers::{gemini::GeminiProvider, spotify::SpotifyProvider},
        ChatResponder,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("music_recommender=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let catalog = CatalogStore::load(&config.songs_path, &config.similarity_path)
        .context("Failed to load song catalog")?;

    let music_search = SpotifyProvider::from_config(&config)?;
    let chat = ChatResponder::new(Arc::new(GeminiProvider::from_config(&config)?));

    let state = AppState::new(Arc::new(catalog), Arc::new(music_search), chat);
    state.sessions.spawn_eviction(config.session_idle());
    let app = create_router(Arc::new(state));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
