//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use printq_core::config::AuthConfig;
use printq_core::error::AppError;

use super::claims::Claims;

/// Validates consumer tokens.
///
/// Every failure is an authorization error: the caller did present a
/// credential, it just is not acceptable.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // seconds of clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token string.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                tracing::debug!(error = %e, "Rejected consumer token");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authorization("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authorization("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authorization("Invalid token signature")
                    }
                    _ => AppError::authorization(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use printq_core::ErrorKind;
    use printq_core::types::{UnitId, UserId};

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_token_carries_unit() {
        let config = config("unit-test-secret");
        let (token, exp) = JwtEncoder::new(&config)
            .generate_token(UserId::from(3), UnitId::from(12), "balcao")
            .unwrap();

        let claims = JwtDecoder::new(&config).decode_token(&token).unwrap();
        assert_eq!(claims.user_id(), UserId::from(3));
        assert_eq!(claims.unit_id(), UnitId::from(12));
        assert_eq!(claims.username, "balcao");
        assert_eq!(claims.exp, exp.timestamp());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let (token, _) = JwtEncoder::new(&config("one"))
            .generate_token(UserId::from(1), UnitId::from(1), "a")
            .unwrap();

        let err = JwtDecoder::new(&config("two"))
            .decode_token(&token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims {
            sub: UserId::from(1),
            unit: UnitId::from(1),
            username: "a".into(),
            iat: 0,
            exp: 60,
            jti: uuid::Uuid::new_v4(),
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(b"s"),
        )
        .unwrap();

        let err = JwtDecoder::new(&config("s")).decode_token(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(err.message, "Token has expired");
    }

    #[test]
    fn test_garbage_rejected() {
        let err = JwtDecoder::new(&config("s"))
            .decode_token("not.a.token")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }
}
