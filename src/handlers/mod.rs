//! HTTP handlers, one module per resource.

pub mod api;
pub mod categories;
pub mod comments;
pub mod reviews;
pub mod users;
pub use api::*;
pub use categories::*;
pub use comments::*;
pub use reviews::*;
pub use users::*;
