use crate::handlers::{
    delete_comment, get_api, get_categories, get_review, get_review_comments, get_reviews, get_users, invalid_path,
    patch_review, post_review_comment,
};
use crate::state::AppState;
use axum::{
    routing::{delete, get},
    Router,
};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api", get(get_api).fallback(invalid_path))
        .route("/api/categories", get(get_categories).fallback(invalid_path))
        .route("/api/reviews", get(get_reviews).fallback(invalid_path))
        .route(
            "/api/reviews/:review_id",
            get(get_review).patch(patch_review).fallback(invalid_path),
        )
        .route(
            "/api/reviews/:review_id/comments",
            get(get_review_comments).post(post_review_comment).fallback(invalid_path),
        )
        .route("/api/comments/:comment_id", delete(delete_comment).fallback(invalid_path))
        .route("/api/users", get(get_users).fallback(invalid_path))
        .with_state(state)
}
