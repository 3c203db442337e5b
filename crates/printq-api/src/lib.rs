//! # printq-api
//!
//! HTTP API layer for PrintQ built on Axum.
//!
//! Producers enqueue with a shared API key; consumers log in, then claim,
//! complete, list, and reprint jobs of their own unit with a bearer token.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
