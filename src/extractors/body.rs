//! JSON request body that may be absent.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;

/// `Some(body)` when the request carries a JSON object of the right shape.
///
/// A missing, non-JSON or malformed body is `None` so the handler reports the missing
/// fields. A body over the configured limit is rejected with 413.
#[derive(Debug)]
pub struct JsonBody<T>(pub Option<T>);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(body)) => Ok(JsonBody(Some(body))),
            Err(rejection) => absent_or_rejected(rejection).map(|()| JsonBody(None)),
        }
    }
}

fn absent_or_rejected(rejection: JsonRejection) -> Result<(), AppError> {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return Err(AppError::PayloadTooLarge);
    }
    tracing::debug!(reason = %rejection.body_text(), "request body ignored");
    Ok(())
}
