//! Comment handlers: list for a review, create, delete.

use crate::error::AppError;
use crate::extractors::{IdParam, JsonBody};
use crate::models::NewComment;
use crate::response::{success_created, success_ok};
use crate::service::{comment_fields, CommentService};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

pub async fn get_review_comments(
    State(state): State<AppState>,
    IdParam(review_id): IdParam,
) -> Result<impl IntoResponse, AppError> {
    let comments = CommentService::list_for_review(state.store.as_ref(), review_id).await?;
    Ok(success_ok("comments", comments))
}

pub async fn post_review_comment(
    State(state): State<AppState>,
    IdParam(review_id): IdParam,
    JsonBody(body): JsonBody<NewComment>,
) -> Result<impl IntoResponse, AppError> {
    let (username, body) = comment_fields(body)?;
    let comment = CommentService::create(state.store.as_ref(), review_id, &username, &body).await?;
    Ok(success_created("comment", comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    IdParam(comment_id): IdParam,
) -> Result<impl IntoResponse, AppError> {
    CommentService::delete(state.store.as_ref(), comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
