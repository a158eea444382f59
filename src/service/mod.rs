//! Per-resource operations: existence checks and error shaping on top of the store.

mod comments;
mod reviews;
mod validation;
pub use comments::CommentService;
pub use reviews::ReviewService;
pub use validation::{comment_fields, parse_id, vote_delta};
