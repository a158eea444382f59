//! Store interface shared by handlers, plus database bootstrap helpers.

mod memory;
mod postgres;
mod seed;

pub use memory::MemoryStore;
pub use postgres::{ensure_schema, PgStore};
pub use seed::{seed, Dataset, SeedComment, SeedReview};

use crate::config::{ServerConfig, StoreBackend};
use crate::error::AppError;
use crate::models::{Category, Comment, Review, ReviewDetail, ReviewSummary, User};
use crate::sql::ReviewListQuery;
use async_trait::async_trait;
use sqlx::ConnectOptions;
use std::str::FromStr;
use std::sync::Arc;

/// Data access for every route. Constructed once at startup and shared as `Arc<dyn Store>`.
///
/// Implementations return `Ok(None)` / `Ok(false)` for missing rows; turning that into
/// a client-facing error is the service layer's job.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short name for logs ("postgres", "memory").
    fn backend_tag(&self) -> &'static str;

    async fn ping(&self) -> Result<(), AppError>;

    async fn categories(&self) -> Result<Vec<Category>, AppError>;

    async fn category_exists(&self, slug: &str) -> Result<bool, AppError>;

    async fn reviews(&self, query: &ReviewListQuery) -> Result<Vec<ReviewSummary>, AppError>;

    async fn review(&self, review_id: i32) -> Result<Option<ReviewDetail>, AppError>;

    async fn review_exists(&self, review_id: i32) -> Result<bool, AppError>;

    /// Add `delta` to the review's votes, flooring the result at 0.
    async fn add_review_votes(&self, review_id: i32, delta: i64) -> Result<Option<Review>, AppError>;

    /// Newest first.
    async fn comments_for_review(&self, review_id: i32) -> Result<Vec<Comment>, AppError>;

    async fn user_exists(&self, username: &str) -> Result<bool, AppError>;

    async fn insert_comment(&self, review_id: i32, author: &str, body: &str) -> Result<Comment, AppError>;

    /// Returns false when no comment had that id.
    async fn delete_comment(&self, comment_id: i32) -> Result<bool, AppError>;

    async fn users(&self) -> Result<Vec<User>, AppError>;
}

/// Build the configured store. For PostgreSQL this creates the database and tables if missing.
pub async fn open(config: &ServerConfig) -> Result<Arc<dyn Store>, AppError> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; changes are lost on restart");
            Ok(Arc::new(MemoryStore::seeded()?))
        }
        StoreBackend::Postgres => {
            ensure_database_exists(&config.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await?;
            ensure_schema(&pool).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

/// Create the database named in `database_url` if it does not exist (connects to `postgres` db to run CREATE DATABASE).
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let Some((admin_url, db_name)) = parse_db_name_from_url(database_url) else {
        return Ok(());
    };
    if db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::Config(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split a connection URL into (admin URL on the `postgres` database, database name).
/// `None` when the URL names no database, e.g. `postgres://localhost`.
fn parse_db_name_from_url(url: &str) -> Option<(String, String)> {
    let authority_start = url.find("://").map_or(0, |i| i + 3);
    let path_start = authority_start + url.get(authority_start..)?.find('/')? + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    if db_name.is_empty() {
        return None;
    }
    let base = url.get(..path_start).unwrap_or(url);
    Some((format!("{}postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_database_name_from_url() {
        let (admin, db) = parse_db_name_from_url("postgres://user:pw@localhost:5432/nc_games?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://user:pw@localhost:5432/postgres");
        assert_eq!(db, "nc_games");
    }

    #[test]
    fn url_without_database_names_none() {
        assert!(parse_db_name_from_url("postgres://localhost").is_none());
        assert!(parse_db_name_from_url("postgres://user@localhost:5432/").is_none());
        assert!(parse_db_name_from_url("postgres://localhost?sslmode=disable").is_none());
    }

    #[tokio::test]
    async fn url_without_database_skips_creation() {
        // Returns before any connection is attempted.
        ensure_database_exists("postgres://localhost").await.unwrap();
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("nc_games"), "\"nc_games\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
