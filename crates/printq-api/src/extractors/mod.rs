//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod path;
pub mod producer;

pub use auth::AuthConsumer;
pub use json::ValidatedJson;
pub use path::parse_job_id;
pub use producer::Producer;
