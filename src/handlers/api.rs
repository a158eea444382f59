use crate::docs::api_document;
use crate::error::AppError;
use axum::Json;
use serde_json::Value;

pub async fn get_api() -> Json<Value> {
    Json(api_document())
}

/// Any unmatched path or method.
pub async fn invalid_path() -> AppError {
    AppError::RouteNotFound
}
