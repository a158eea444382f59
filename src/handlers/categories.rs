use crate::error::AppError;
use crate::response::success_ok;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

pub async fn get_categories(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let categories = state.store.categories().await?;
    Ok(success_ok("categories", categories))
}
