//! Seed dataset and database reset. Review and comment ids follow fixture order, starting at 1.

use super::postgres::{TABLES_DROP_ORDER, TABLE_DDL};
use crate::error::AppError;
use crate::models::{Category, User};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;

#[derive(Clone, Debug, Deserialize)]
pub struct SeedReview {
    pub title: String,
    pub designer: String,
    pub owner: String,
    pub review_img_url: String,
    pub review_body: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub votes: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SeedComment {
    pub body: String,
    pub votes: i32,
    pub author: String,
    pub review_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct Dataset {
    pub categories: Vec<Category>,
    pub users: Vec<User>,
    pub reviews: Vec<SeedReview>,
    pub comments: Vec<SeedComment>,
}

impl Dataset {
    /// Parse a dataset from the JSON text of its four tables.
    pub fn from_json(categories: &str, users: &str, reviews: &str, comments: &str) -> Result<Self, AppError> {
        let parse_err = |table: &str, e: serde_json::Error| AppError::Config(format!("seed data {}: {}", table, e));
        Ok(Dataset {
            categories: serde_json::from_str(categories).map_err(|e| parse_err("categories", e))?,
            users: serde_json::from_str(users).map_err(|e| parse_err("users", e))?,
            reviews: serde_json::from_str(reviews).map_err(|e| parse_err("reviews", e))?,
            comments: serde_json::from_str(comments).map_err(|e| parse_err("comments", e))?,
        })
    }

    /// The fixture the test suite runs against: 4 categories, 4 users, 13 reviews, 6 comments.
    pub fn test() -> Result<Self, AppError> {
        Self::from_json(
            include_str!("../../data/test/categories.json"),
            include_str!("../../data/test/users.json"),
            include_str!("../../data/test/reviews.json"),
            include_str!("../../data/test/comments.json"),
        )
    }
}

/// Drop and recreate all tables, then insert the dataset in one transaction.
pub async fn seed(pool: &PgPool, data: &Dataset) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for table in TABLES_DROP_ORDER {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(&mut *tx)
            .await?;
    }
    for ddl in TABLE_DDL {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }

    for c in &data.categories {
        sqlx::query("INSERT INTO categories (slug, description) VALUES ($1, $2)")
            .bind(&c.slug)
            .bind(&c.description)
            .execute(&mut *tx)
            .await?;
    }
    for u in &data.users {
        sqlx::query("INSERT INTO users (username, name, avatar_url) VALUES ($1, $2, $3)")
            .bind(&u.username)
            .bind(&u.name)
            .bind(&u.avatar_url)
            .execute(&mut *tx)
            .await?;
    }
    for r in &data.reviews {
        sqlx::query(
            "INSERT INTO reviews (title, designer, owner, review_img_url, review_body, category, created_at, votes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&r.title)
        .bind(&r.designer)
        .bind(&r.owner)
        .bind(&r.review_img_url)
        .bind(&r.review_body)
        .bind(&r.category)
        .bind(r.created_at)
        .bind(r.votes)
        .execute(&mut *tx)
        .await?;
    }
    for c in &data.comments {
        sqlx::query("INSERT INTO comments (body, votes, author, review_id, created_at) VALUES ($1, $2, $3, $4, $5)")
            .bind(&c.body)
            .bind(c.votes)
            .bind(&c.author)
            .bind(c.review_id)
            .bind(c.created_at)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    tracing::info!(
        categories = data.categories.len(),
        users = data.users.len(),
        reviews = data.reviews.len(),
        comments = data.comments.len(),
        "database seeded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_parses() {
        let data = Dataset::test().unwrap();
        assert_eq!(data.categories.len(), 4);
        assert_eq!(data.users.len(), 4);
        assert_eq!(data.reviews.len(), 13);
        assert_eq!(data.comments.len(), 6);
    }

    #[test]
    fn fixture_references_are_consistent() {
        let data = Dataset::test().unwrap();
        let has_user = |name: &str| data.users.iter().any(|u| u.username == name);
        for r in &data.reviews {
            assert!(has_user(&r.owner), "unknown owner {}", r.owner);
            assert!(data.categories.iter().any(|c| c.slug == r.category), "unknown category {}", r.category);
        }
        for c in &data.comments {
            assert!(has_user(&c.author), "unknown author {}", c.author);
            assert!(c.review_id >= 1 && c.review_id as usize <= data.reviews.len());
        }
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = Dataset::from_json("[]", "[]", "{", "[]").unwrap_err();
        assert!(matches!(err, AppError::Config(ref m) if m.starts_with("seed data reviews")));
    }
}
