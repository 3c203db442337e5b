//! Argon2id password hashing and verification.

use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use printq_core::error::AppError;

/// Handles password hashing and verification using Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

impl PasswordHasher {
    /// Checks a login attempt against an account's stored hash, if any.
    ///
    /// Without an account the password is checked against a throwaway hash,
    /// so unknown usernames cost one Argon2 verification like wrong passwords.
    pub fn verify_account(&self, password: &str, stored: Option<&str>) -> Result<bool, AppError> {
        match stored {
            Some(hash) => self.verify_password(password, hash),
            None => {
                if let Some(decoy) = decoy_hash() {
                    let _ = self.verify_password(password, decoy);
                }
                Ok(false)
            }
        }
    }
}

fn decoy_hash() -> Option<&'static str> {
    static DECOY: OnceLock<Option<String>> = OnceLock::new();
    DECOY
        .get_or_init(|| PasswordHasher.hash_password("printq-no-such-account").ok())
        .as_deref()
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("tinta-azul").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("tinta-azul", &hash).unwrap());
        assert!(!hasher.verify_password("tinta-preta", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let hasher = PasswordHasher::new();
        let a = hasher.hash_password("same").unwrap();
        let b = hasher.hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_missing_account_never_verifies() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify_account("printq-no-such-account", None).unwrap());
        assert!(!hasher.verify_account("", None).unwrap());

        let hash = hasher.hash_password("tinta-azul").unwrap();
        assert!(hasher.verify_account("tinta-azul", Some(&hash)).unwrap());
    }

    #[test]
    fn test_garbage_hash_is_internal_error() {
        let err = PasswordHasher::new()
            .verify_password("x", "not-a-phc-string")
            .unwrap_err();
        assert_eq!(err.kind, printq_core::ErrorKind::Internal);
    }
}
