//! Route definitions for the PrintQ HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(status_routes())
        .merge(auth_routes())
        .merge(job_routes())
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness and health
fn status_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health))
}

/// Consumer login
fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(handlers::auth::login))
}

/// Queue, history, and reprint
fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs/new", post(handlers::jobs::enqueue))
        .route("/jobs/next", get(handlers::jobs::claim_next))
        .route("/jobs/history", get(handlers::jobs::history))
        .route("/jobs/{id}", get(handlers::jobs::get_job))
        .route("/jobs/{id}/complete", post(handlers::jobs::complete))
        .route("/jobs/{id}/reprint", post(handlers::jobs::reprint))
}
