//! The job queue state machine.

pub mod engine;
pub mod policy;

pub use engine::QueueEngine;
pub use policy::RetryPolicy;
