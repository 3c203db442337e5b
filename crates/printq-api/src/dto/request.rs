//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Login request body.
///
/// Missing fields deserialize as empty so they fail validation with 400.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[serde(default)]
    #[validate(length(min = 1, message = "Username and password are required"))]
    pub username: String,
    /// Password.
    #[serde(default)]
    #[validate(length(min = 1, message = "Username and password are required"))]
    pub password: String,
}

/// Producer enqueue body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EnqueueRequest {
    /// Unit that will print the job.
    #[validate(range(min = 1, message = "unit_id must be a positive integer"))]
    pub unit_id: i64,
    /// Printable payload; must be a non-empty JSON object.
    #[serde(default)]
    pub job_data: Option<Value>,
}

/// Query string for the history listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of jobs to return.
    pub limit: Option<i64>,
}
