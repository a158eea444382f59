//! Routing table. Unmatched paths and unsupported methods on known paths both get the 404 fallback.

mod api;
mod common;
pub use api::api_routes;
pub use common::common_routes;

use crate::handlers::invalid_path;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;

/// Default request body limit in bytes.
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Full application: /api routes, health routes, fallback, request tracing and body limit.
pub fn build_router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(api_routes(state.clone()))
        .merge(common_routes(state))
        .fallback(invalid_path)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}
