use std::sync::Arc;

use anyhow::{Context, Result};
use diy_assistant::{config::AppConfig, routes, state::AppState};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("diy_assistant=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    if config.completion.api_key.is_none() {
        warn!("OPENROUTER_API_KEY not set; on-topic questions will get the fallback reply");
    }

    let state = Arc::new(AppState::from_config(&config));

    let sweeper = Arc::clone(&state);
    let ttl = config.session_ttl;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(ttl.max(std::time::Duration::from_secs(1)));
        loop {
            interval.tick().await;
            let removed = sweeper.sessions.purge_expired().await;
            if removed > 0 {
                debug!(removed, "purged idle chat sessions");
            }
        }
    });

    let cors = CorsLayer::very_permissive();

    let app = routes::create_router().with_state(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!("DIY assistant running at http://{}", config.bind_addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
