//! Postgres user store.

use async_trait::async_trait;
use sqlx::PgPool;

use printq_core::result::AppResult;
use printq_entity::user::{CreateUser, User};

use crate::error::map_sqlx_error;
use crate::store::UserStore;

/// User store backed by the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find user by username", e))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash, unit_id) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.username)
        .bind(&data.password_hash)
        .bind(data.unit_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to create user", e))
    }
}
