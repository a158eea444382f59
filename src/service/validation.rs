//! Request validation that runs before any query is issued.

use crate::error::AppError;
use crate::models::{NewComment, VotePatch};
use serde_json::Value;

/// Path identifiers must be integers that fit the SERIAL columns.
pub fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>().map_err(|_| AppError::InvalidId)
}

/// `inc_votes` is required and must be an integer. A missing or unparseable body counts as missing.
pub fn vote_delta(patch: Option<VotePatch>) -> Result<i64, AppError> {
    match patch.and_then(|p| p.inc_votes) {
        None | Some(Value::Null) => Err(AppError::MissingVotes),
        Some(v) => v.as_i64().ok_or(AppError::InvalidVotes),
    }
}

/// Both `username` and `body` are required and non-blank. Returns (username, body).
pub fn comment_fields(comment: Option<NewComment>) -> Result<(String, String), AppError> {
    let comment = comment.unwrap_or_default();
    let filled = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
    match (filled(comment.username), filled(comment.body)) {
        (Some(username), Some(body)) => Ok((username, body)),
        _ => Err(AppError::IncompleteBody),
    }
}
