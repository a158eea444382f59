//! Board game reviews REST API: categories, reviews, comments and users over PostgreSQL.

pub mod config;
pub mod docs;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{ServerConfig, StoreBackend};
pub use error::AppError;
pub use routes::{build_router, DEFAULT_BODY_LIMIT};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_schema, seed, Dataset, MemoryStore, PgStore, Store};
