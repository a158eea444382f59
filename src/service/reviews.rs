use crate::error::AppError;
use crate::models::{Review, ReviewDetail, ReviewSummary};
use crate::sql::ReviewListQuery;
use crate::store::Store;

pub struct ReviewService;

impl ReviewService {
    /// List reviews. A category filter must name an existing category; one with no reviews yields `[]`.
    pub async fn list(store: &dyn Store, query: &ReviewListQuery) -> Result<Vec<ReviewSummary>, AppError> {
        if let Some(slug) = &query.category {
            if !store.category_exists(slug).await? {
                return Err(AppError::NotFound(format!("Category {} does not exist", slug)));
            }
        }
        store.reviews(query).await
    }

    pub async fn read(store: &dyn Store, review_id: i32) -> Result<ReviewDetail, AppError> {
        store
            .review(review_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No review found for review ID {}", review_id)))
    }

    /// Apply a signed vote delta; the stored count never drops below 0.
    pub async fn add_votes(store: &dyn Store, review_id: i32, delta: i64) -> Result<Review, AppError> {
        store
            .add_review_votes(review_id, delta)
            .await?
            .ok_or_else(|| AppError::NotFound("Review ID does not exist".into()))
    }
}
