//! Integer id from the single path parameter of a route.

use crate::error::AppError;
use crate::service::parse_id;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// `:review_id` / `:comment_id` as `i32`. Anything that fails to decode or parse is "Invalid ID".
#[derive(Clone, Copy, Debug)]
pub struct IdParam(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for IdParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::InvalidId)?;
        parse_id(&raw).map(IdParam)
    }
}
