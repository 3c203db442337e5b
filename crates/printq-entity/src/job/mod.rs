//! Print job domain entities.

pub mod model;
pub mod payload;
pub mod status;

pub use model::Job;
pub use payload::{REPRINT_OF_KEY, annotate_reprint, validate_payload};
pub use status::JobStatus;
