//! Review handlers: list with filter/sort/order, read one, patch votes.

use crate::error::AppError;
use crate::extractors::{IdParam, JsonBody};
use crate::models::VotePatch;
use crate::response::success_ok;
use crate::service::{vote_delta, ReviewService};
use crate::sql::ReviewListQuery;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use std::collections::HashMap;

pub async fn get_reviews(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let query = ReviewListQuery::parse(
        params.get("category").map(String::as_str),
        params.get("sort_by").map(String::as_str),
        params.get("order").map(String::as_str),
    )?;
    let reviews = ReviewService::list(state.store.as_ref(), &query).await?;
    Ok(success_ok("reviews", reviews))
}

pub async fn get_review(
    State(state): State<AppState>,
    IdParam(review_id): IdParam,
) -> Result<impl IntoResponse, AppError> {
    let review = ReviewService::read(state.store.as_ref(), review_id).await?;
    Ok(success_ok("review", review))
}

/// A missing or non-JSON body is treated as an empty object, so it reports "No votes found".
pub async fn patch_review(
    State(state): State<AppState>,
    IdParam(review_id): IdParam,
    JsonBody(body): JsonBody<VotePatch>,
) -> Result<impl IntoResponse, AppError> {
    let delta = vote_delta(body)?;
    let review = ReviewService::add_votes(state.store.as_ref(), review_id, delta).await?;
    Ok(success_ok("review", review))
}
