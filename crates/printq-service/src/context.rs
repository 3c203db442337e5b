//! Context for an authenticated consumer.

use serde::{Deserialize, Serialize};

use printq_auth::Claims;
use printq_core::types::{UnitId, UserId};

/// Who is acting, and for which unit.
///
/// Built from a verified bearer token. Every consumer-facing operation is
/// scoped to `unit_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The unit the token is bound to.
    pub unit_id: UnitId,
    /// The username (convenience field from the token).
    pub username: String,
}

impl From<Claims> for ConsumerContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id(),
            unit_id: claims.unit_id(),
            username: claims.username,
        }
    }
}
