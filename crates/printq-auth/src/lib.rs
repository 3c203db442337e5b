//! # printq-auth
//!
//! Credential handling for the two kinds of PrintQ callers.
//!
//! ## Modules
//!
//! - `jwt` — unit-bound bearer tokens for consumers (print agents)
//! - `password` — Argon2id password hashing for consumer accounts
//! - `api_key` — shared-key check for producers

pub mod api_key;
pub mod jwt;
pub mod password;

pub use api_key::ApiKeyVerifier;
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
