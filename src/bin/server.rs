//! HTTP server: reads config from env (.env honoured), opens the store, serves the API.

use game_reviews::{build_router, store, AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("game_reviews=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let backend = store::open(&config).await?;
    tracing::info!(backend = backend.backend_tag(), "store ready");

    let app = build_router(AppState::new(backend), config.body_limit_bytes);
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
