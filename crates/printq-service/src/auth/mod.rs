//! Consumer login and account creation.

pub mod service;

pub use service::{AuthService, LoginOutcome};
