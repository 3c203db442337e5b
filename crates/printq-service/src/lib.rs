//! # printq-service
//!
//! Business logic for PrintQ. Each service is handed its stores at
//! construction time via `Arc` references; nothing here holds a global
//! pool or knows about HTTP.

pub mod auth;
pub mod context;
pub mod history;
pub mod queue;

pub use auth::{AuthService, LoginOutcome};
pub use context::ConsumerContext;
pub use history::HistoryService;
pub use queue::{QueueEngine, RetryPolicy};
