use crate::error::AppError;
use crate::models::Comment;
use crate::store::Store;

pub struct CommentService;

impl CommentService {
    pub async fn list_for_review(store: &dyn Store, review_id: i32) -> Result<Vec<Comment>, AppError> {
        if !store.review_exists(review_id).await? {
            return Err(AppError::NotFound(format!("review ID {} does not exist", review_id)));
        }
        store.comments_for_review(review_id).await
    }

    /// Review existence is checked before the author. The two checks and the insert are not atomic;
    /// a review deleted in between surfaces as the store's foreign-key mapping instead.
    pub async fn create(store: &dyn Store, review_id: i32, author: &str, body: &str) -> Result<Comment, AppError> {
        if !store.review_exists(review_id).await? {
            return Err(AppError::NotFound("Review ID does not exist".into()));
        }
        if !store.user_exists(author).await? {
            return Err(AppError::InvalidUsername);
        }
        let comment = store.insert_comment(review_id, author, body).await?;
        tracing::info!(comment_id = comment.comment_id, review_id, author = %author, "comment created");
        Ok(comment)
    }

    pub async fn delete(store: &dyn Store, comment_id: i32) -> Result<(), AppError> {
        if !store.delete_comment(comment_id).await? {
            return Err(AppError::NotFound(format!("Comment ID {} does not exist", comment_id)));
        }
        tracing::info!(comment_id, "comment deleted");
        Ok(())
    }
}
