//! Request extractors whose rejections render as `{"msg": ...}` like every other error.

mod body;
mod id;
pub use body::JsonBody;
pub use id::IdParam;
