//! Producer API key check.

use printq_core::config::AuthConfig;
use printq_core::error::AppError;

/// Checks the shared key presented by producers in `x-api-key`.
#[derive(Clone)]
pub struct ApiKeyVerifier {
    expected: String,
}

impl std::fmt::Debug for ApiKeyVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyVerifier").finish_non_exhaustive()
    }
}

impl ApiKeyVerifier {
    /// Creates a verifier for the configured producer key.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            expected: config.producer_api_key.clone(),
        }
    }

    /// Accept the presented key or fail with an authentication error.
    ///
    /// A missing and a wrong key are reported the same way.
    pub fn verify(&self, presented: Option<&str>) -> Result<(), AppError> {
        match presented {
            Some(key) if !self.expected.is_empty() && constant_time_eq(key, &self.expected) => {
                Ok(())
            }
            _ => Err(AppError::authentication("Invalid or missing API key")),
        }
    }
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
