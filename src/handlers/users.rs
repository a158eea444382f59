use crate::error::AppError;
use crate::response::success_ok;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

pub async fn get_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = state.store.users().await?;
    Ok(success_ok("users", users))
}
