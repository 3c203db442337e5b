//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use printq_auth::{ApiKeyVerifier, JwtDecoder, JwtEncoder};
use printq_core::config::AppConfig;
use printq_database::{JobStore, UserStore};
use printq_service::{AuthService, HistoryService, QueueEngine};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// When the process started serving
    pub started_at: Instant,

    /// Consumer token validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Producer key check
    pub api_key: Arc<ApiKeyVerifier>,

    /// Queue engine
    pub queue: Arc<QueueEngine>,
    /// History and reprint
    pub history: Arc<HistoryService>,
    /// Login
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Wire services on top of the given stores.
    pub fn new(config: AppConfig, jobs: Arc<dyn JobStore>, users: Arc<dyn UserStore>) -> Self {
        let queue = Arc::new(QueueEngine::new(jobs, config.queue.clone()));
        let history = Arc::new(HistoryService::new(Arc::clone(&queue)));
        let auth = Arc::new(AuthService::new(users, JwtEncoder::new(&config.auth)));

        Self {
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            api_key: Arc::new(ApiKeyVerifier::new(&config.auth)),
            started_at: Instant::now(),
            queue,
            history,
            auth,
        }
    }
}
