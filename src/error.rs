//! Typed errors and HTTP mapping. Every failure renders as `{"msg": "..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid ID")]
    InvalidId,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidQuery(&'static str),
    #[error("No votes found")]
    MissingVotes,
    #[error("Invalid votes")]
    InvalidVotes,
    #[error("Incomplete body")]
    IncompleteBody,
    #[error("Invalid username")]
    InvalidUsername,
    #[error("Invalid file path!")]
    RouteNotFound,
    #[error("Request body too large")]
    PayloadTooLarge,
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("config: {0}")]
    Config(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidId
            | AppError::InvalidQuery(_)
            | AppError::MissingVotes
            | AppError::InvalidVotes
            | AppError::IncompleteBody => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::InvalidUsername | AppError::RouteNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Db(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Store and config failures are not echoed back.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Db(_) | AppError::Config(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub msg: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            msg: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failures_are_bad_requests() {
        for err in [
            AppError::InvalidId,
            AppError::InvalidQuery("Invalid sort query"),
            AppError::MissingVotes,
            AppError::InvalidVotes,
            AppError::IncompleteBody,
        ] {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{err}");
        }
    }

    #[test]
    fn missing_entities_are_not_found() {
        assert_eq!(
            AppError::NotFound("Comment ID 42 does not exist".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::InvalidUsername.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::RouteNotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_failures_hide_details() {
        let err = AppError::Db(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn messages_match_client_contract() {
        assert_eq!(AppError::InvalidId.public_message(), "Invalid ID");
        assert_eq!(AppError::MissingVotes.public_message(), "No votes found");
        assert_eq!(AppError::IncompleteBody.public_message(), "Incomplete body");
        assert_eq!(AppError::RouteNotFound.public_message(), "Invalid file path!");
        assert_eq!(AppError::PayloadTooLarge.public_message(), "Request body too large");
        assert_eq!(AppError::PayloadTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
