//! Custom request extractors that report failures as `ApiError`.

pub mod json;
pub mod path_id;

pub use json::ApiJson;
pub use path_id::{PathId, PathParam};
