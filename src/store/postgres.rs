//! PostgreSQL store over a shared sqlx pool. Every operation is one parameterized statement.

use super::Store;
use crate::error::AppError;
use crate::models::{Category, Comment, Review, ReviewDetail, ReviewSummary, User};
use crate::sql::{select_review_detail, select_reviews, ReviewListQuery};
use async_trait::async_trait;
use sqlx::PgPool;

/// Table DDL in dependency order. Constraint names are relied on when mapping insert failures.
pub(crate) const TABLE_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        slug VARCHAR PRIMARY KEY,
        description VARCHAR NOT NULL
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        username VARCHAR PRIMARY KEY,
        name VARCHAR NOT NULL,
        avatar_url VARCHAR NOT NULL
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS reviews (
        review_id SERIAL PRIMARY KEY,
        title VARCHAR NOT NULL,
        designer VARCHAR NOT NULL,
        owner VARCHAR NOT NULL CONSTRAINT reviews_owner_fkey REFERENCES users(username),
        review_img_url VARCHAR NOT NULL
            DEFAULT 'https://images.pexels.com/photos/163064/play-stone-network-networked-interactive-163064.jpeg',
        review_body TEXT NOT NULL,
        category VARCHAR NOT NULL CONSTRAINT reviews_category_fkey REFERENCES categories(slug),
        votes INT NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        comment_id SERIAL PRIMARY KEY,
        body TEXT NOT NULL,
        votes INT NOT NULL DEFAULT 0,
        author VARCHAR NOT NULL CONSTRAINT comments_author_fkey REFERENCES users(username),
        review_id INT NOT NULL CONSTRAINT comments_review_id_fkey REFERENCES reviews(review_id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
];

/// Tables in reverse dependency order, for dropping.
pub(crate) const TABLES_DROP_ORDER: &[&str] = &["comments", "reviews", "users", "categories"];

const REVIEW_COLUMNS: &str = "review_id, title, designer, owner, review_img_url, review_body, category, votes, created_at";
const COMMENT_COLUMNS: &str = "comment_id, review_id, author, body, votes, created_at";

/// Create the four tables if missing. Idempotent; never alters existing tables.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    for ddl in TABLE_DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Foreign-key failures on comment insert mean the review or author vanished between the
/// existence checks and the insert.
fn map_comment_insert_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_foreign_key_violation() {
            return match db.constraint() {
                Some("comments_author_fkey") => AppError::InvalidUsername,
                _ => AppError::NotFound("Review ID does not exist".into()),
            };
        }
    }
    AppError::Db(e)
}

#[async_trait]
impl Store for PgStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn categories(&self) -> Result<Vec<Category>, AppError> {
        let sql = "SELECT slug, description FROM categories";
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, Category>(sql).fetch_all(&self.pool).await?)
    }

    async fn category_exists(&self, slug: &str) -> Result<bool, AppError> {
        let sql = "SELECT EXISTS(SELECT 1 FROM categories WHERE slug = $1)";
        tracing::debug!(sql = %sql, slug = %slug, "query");
        Ok(sqlx::query_scalar::<_, bool>(sql).bind(slug).fetch_one(&self.pool).await?)
    }

    async fn reviews(&self, query: &ReviewListQuery) -> Result<Vec<ReviewSummary>, AppError> {
        let q = select_reviews(query);
        tracing::debug!(sql = %q.sql, params = ?q.params, sort_by = %query.sort_by, "query");
        let mut stmt = sqlx::query_as::<_, ReviewSummary>(&q.sql);
        for p in &q.params {
            stmt = stmt.bind(p);
        }
        Ok(stmt.fetch_all(&self.pool).await?)
    }

    async fn review(&self, review_id: i32) -> Result<Option<ReviewDetail>, AppError> {
        let q = select_review_detail();
        tracing::debug!(sql = %q.sql, review_id, "query");
        Ok(sqlx::query_as::<_, ReviewDetail>(&q.sql)
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn review_exists(&self, review_id: i32) -> Result<bool, AppError> {
        let sql = "SELECT EXISTS(SELECT 1 FROM reviews WHERE review_id = $1)";
        tracing::debug!(sql = %sql, review_id, "query");
        Ok(sqlx::query_scalar::<_, bool>(sql).bind(review_id).fetch_one(&self.pool).await?)
    }

    async fn add_review_votes(&self, review_id: i32, delta: i64) -> Result<Option<Review>, AppError> {
        // Computed in numeric so extreme deltas saturate instead of overflowing the INT column.
        let sql = format!(
            "UPDATE reviews SET votes = LEAST(GREATEST(votes::numeric + $1, 0), 2147483647)::int \
             WHERE review_id = $2 RETURNING {}",
            REVIEW_COLUMNS
        );
        tracing::debug!(sql = %sql, review_id, delta, "query");
        Ok(sqlx::query_as::<_, Review>(&sql)
            .bind(delta)
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn comments_for_review(&self, review_id: i32) -> Result<Vec<Comment>, AppError> {
        let sql = format!(
            "SELECT {} FROM comments WHERE review_id = $1 ORDER BY created_at DESC, comment_id DESC",
            COMMENT_COLUMNS
        );
        tracing::debug!(sql = %sql, review_id, "query");
        Ok(sqlx::query_as::<_, Comment>(&sql)
            .bind(review_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn user_exists(&self, username: &str) -> Result<bool, AppError> {
        let sql = "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)";
        tracing::debug!(sql = %sql, username = %username, "query");
        Ok(sqlx::query_scalar::<_, bool>(sql).bind(username).fetch_one(&self.pool).await?)
    }

    async fn insert_comment(&self, review_id: i32, author: &str, body: &str) -> Result<Comment, AppError> {
        let sql = format!(
            "INSERT INTO comments (review_id, author, body) VALUES ($1, $2, $3) RETURNING {}",
            COMMENT_COLUMNS
        );
        tracing::debug!(sql = %sql, review_id, author = %author, "query");
        sqlx::query_as::<_, Comment>(&sql)
            .bind(review_id)
            .bind(author)
            .bind(body)
            .fetch_one(&self.pool)
            .await
            .map_err(map_comment_insert_error)
    }

    async fn delete_comment(&self, comment_id: i32) -> Result<bool, AppError> {
        let sql = "DELETE FROM comments WHERE comment_id = $1";
        tracing::debug!(sql = %sql, comment_id, "query");
        let result = sqlx::query(sql).bind(comment_id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn users(&self) -> Result<Vec<User>, AppError> {
        let sql = "SELECT username, name, avatar_url FROM users";
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, User>(sql).fetch_all(&self.pool).await?)
    }
}
