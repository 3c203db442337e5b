//! JWT claims carried by consumer bearer tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use printq_core::types::{UnitId, UserId};

/// Claims payload embedded in every consumer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: UserId,
    /// Unit the bearer may act for.
    pub unit: UnitId,
    /// Username for convenience.
    pub username: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token ID.
    pub jti: Uuid,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> UserId {
        self.sub
    }

    /// Returns the unit the token is bound to.
    pub fn unit_id(&self) -> UnitId {
        self.unit
    }
}
