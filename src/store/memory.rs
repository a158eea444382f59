use super::{Dataset, Store};
use crate::error::AppError;
use crate::models::{Category, Comment, Review, ReviewDetail, ReviewSummary, User};
use crate::sql::{ReviewListQuery, SortColumn, SortOrder};
use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use tokio::sync::RwLock;

/// In-process store holding the whole dataset. Not persistent; used by tests and `STORE_BACKEND=memory`.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

struct Tables {
    categories: Vec<Category>,
    users: Vec<User>,
    reviews: Vec<Review>,
    comments: Vec<Comment>,
    next_comment_id: i32,
}

impl Tables {
    fn comment_count(&self, review_id: i32) -> usize {
        self.comments.iter().filter(|c| c.review_id == review_id).count()
    }
}

impl MemoryStore {
    pub fn new(data: &Dataset) -> Self {
        let reviews: Vec<Review> = data
            .reviews
            .iter()
            .zip(1..)
            .map(|(r, review_id)| Review {
                review_id,
                title: r.title.clone(),
                designer: r.designer.clone(),
                owner: r.owner.clone(),
                review_img_url: r.review_img_url.clone(),
                review_body: r.review_body.clone(),
                category: r.category.clone(),
                votes: r.votes,
                created_at: r.created_at,
            })
            .collect();
        let comments: Vec<Comment> = data
            .comments
            .iter()
            .zip(1..)
            .map(|(c, comment_id)| Comment {
                comment_id,
                review_id: c.review_id,
                author: c.author.clone(),
                body: c.body.clone(),
                votes: c.votes,
                created_at: c.created_at,
            })
            .collect();
        let next_comment_id = comments.len() as i32 + 1;
        MemoryStore {
            tables: RwLock::new(Tables {
                categories: data.categories.clone(),
                users: data.users.clone(),
                reviews,
                comments,
                next_comment_id,
            }),
        }
    }

    /// Store loaded with the test fixture.
    pub fn seeded() -> Result<Self, AppError> {
        Ok(Self::new(&Dataset::test()?))
    }
}

fn compare_by(column: SortColumn, a: &(usize, ReviewSummary), b: &(usize, ReviewSummary)) -> Ordering {
    let (a_count, a) = a;
    let (b_count, b) = b;
    match column {
        SortColumn::ReviewId => a.review_id.cmp(&b.review_id),
        SortColumn::Owner => a.owner.cmp(&b.owner),
        SortColumn::Title => a.title.cmp(&b.title),
        SortColumn::Designer => a.designer.cmp(&b.designer),
        SortColumn::ReviewImgUrl => a.review_img_url.cmp(&b.review_img_url),
        SortColumn::Category => a.category.cmp(&b.category),
        SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
        SortColumn::Votes => a.votes.cmp(&b.votes),
        SortColumn::CommentCount => a_count.cmp(b_count),
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn categories(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.tables.read().await.categories.clone())
    }

    async fn category_exists(&self, slug: &str) -> Result<bool, AppError> {
        Ok(self.tables.read().await.categories.iter().any(|c| c.slug == slug))
    }

    async fn reviews(&self, query: &ReviewListQuery) -> Result<Vec<ReviewSummary>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<(usize, ReviewSummary)> = tables
            .reviews
            .iter()
            .filter(|r| query.category.as_deref().map_or(true, |c| r.category == c))
            .map(|r| {
                let count = tables.comment_count(r.review_id);
                (
                    count,
                    ReviewSummary {
                        review_id: r.review_id,
                        owner: r.owner.clone(),
                        title: r.title.clone(),
                        designer: r.designer.clone(),
                        review_img_url: r.review_img_url.clone(),
                        category: r.category.clone(),
                        created_at: r.created_at,
                        votes: r.votes,
                        comment_count: count.to_string(),
                    },
                )
            })
            .collect();
        rows.sort_by(|a, b| {
            let ord = compare_by(query.sort_by, a, b);
            let ord = match query.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            };
            ord.then(a.1.review_id.cmp(&b.1.review_id))
        });
        Ok(rows.into_iter().map(|(_, r)| r).collect())
    }

    async fn review(&self, review_id: i32) -> Result<Option<ReviewDetail>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .iter()
            .find(|r| r.review_id == review_id)
            .map(|r| ReviewDetail {
                review: r.clone(),
                comment_count: tables.comment_count(review_id).to_string(),
            }))
    }

    async fn review_exists(&self, review_id: i32) -> Result<bool, AppError> {
        Ok(self.tables.read().await.reviews.iter().any(|r| r.review_id == review_id))
    }

    async fn add_review_votes(&self, review_id: i32, delta: i64) -> Result<Option<Review>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .reviews
            .iter_mut()
            .find(|r| r.review_id == review_id)
            .map(|r| {
                r.votes = i64::from(r.votes).saturating_add(delta).clamp(0, i64::from(i32::MAX)) as i32;
                r.clone()
            }))
    }

    async fn comments_for_review(&self, review_id: i32) -> Result<Vec<Comment>, AppError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| c.review_id == review_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.comment_id.cmp(&a.comment_id))
        });
        Ok(comments)
    }

    async fn user_exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.tables.read().await.users.iter().any(|u| u.username == username))
    }

    async fn insert_comment(&self, review_id: i32, author: &str, body: &str) -> Result<Comment, AppError> {
        let mut tables = self.tables.write().await;
        // Same outcome as the foreign keys on the comments table.
        if !tables.reviews.iter().any(|r| r.review_id == review_id) {
            return Err(AppError::NotFound("Review ID does not exist".into()));
        }
        if !tables.users.iter().any(|u| u.username == author) {
            return Err(AppError::InvalidUsername);
        }
        let comment = Comment {
            comment_id: tables.next_comment_id,
            review_id,
            author: author.to_string(),
            body: body.to_string(),
            votes: 0,
            created_at: Utc::now(),
        };
        tables.next_comment_id += 1;
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn delete_comment(&self, comment_id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.comment_id != comment_id);
        Ok(tables.comments.len() < before)
    }

    async fn users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.tables.read().await.users.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::seeded().unwrap()
    }

    #[tokio::test]
    async fn votes_floor_at_zero() {
        let s = store();
        let r = s.add_review_votes(2, -6).await.unwrap().unwrap();
        assert_eq!(r.votes, 0);
        let r = s.add_review_votes(2, 3).await.unwrap().unwrap();
        assert_eq!(r.votes, 3);
    }

    #[tokio::test]
    async fn votes_saturate_at_int_max() {
        let s = store();
        let r = s.add_review_votes(1, i64::MAX).await.unwrap().unwrap();
        assert_eq!(r.votes, i32::MAX);
    }

    #[tokio::test]
    async fn unknown_review_vote_is_none() {
        assert!(store().add_review_votes(999, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn comment_count_tracks_inserts_and_deletes() {
        let s = store();
        assert_eq!(s.review(8).await.unwrap().unwrap().comment_count, "0");
        let c = s.insert_comment(8, "dav3rid", "first!").await.unwrap();
        assert_eq!(c.comment_id, 7);
        assert_eq!(s.review(8).await.unwrap().unwrap().comment_count, "1");
        assert!(s.delete_comment(c.comment_id).await.unwrap());
        assert!(!s.delete_comment(c.comment_id).await.unwrap());
        assert_eq!(s.review(8).await.unwrap().unwrap().comment_count, "0");
    }

    #[tokio::test]
    async fn insert_checks_references() {
        let s = store();
        let err = s.insert_comment(100, "dav3rid", "x").await.unwrap_err();
        assert_eq!(err.to_string(), "Review ID does not exist");
        let err = s.insert_comment(3, "sugar", "x").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidUsername));
    }

    #[tokio::test]
    async fn list_ties_break_on_review_id() {
        let s = store();
        let query = ReviewListQuery {
            sort_by: SortColumn::Owner,
            order: SortOrder::Desc,
            ..Default::default()
        };
        let rows = s.reviews(&query).await.unwrap();
        let mallionaire: Vec<i32> = rows
            .iter()
            .filter(|r| r.owner == "mallionaire")
            .map(|r| r.review_id)
            .collect();
        let mut sorted = mallionaire.clone();
        sorted.sort();
        assert_eq!(mallionaire, sorted);
    }
}
