//! Drops, recreates and seeds the database at DATABASE_URL with the bundled dataset.

use game_reviews::{ensure_database_exists, seed, Dataset, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("game_reviews=info")))
        .init();

    let config = ServerConfig::from_env()?;
    ensure_database_exists(&config.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await?;
    seed(&pool, &Dataset::test()?).await?;
    pool.close().await;
    Ok(())
}
