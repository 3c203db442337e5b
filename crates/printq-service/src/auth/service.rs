//! Login and account provisioning for consumers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use printq_auth::{JwtEncoder, PasswordHasher};
use printq_core::error::AppError;
use printq_core::result::AppResult;
use printq_core::types::UnitId;
use printq_database::UserStore;
use printq_entity::user::{CreateUser, User};

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Signed bearer token.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// The authenticated account.
    pub user: User,
}

/// Verifies consumer credentials and issues unit-bound tokens.
#[derive(Clone)]
pub struct AuthService {
    /// Account store.
    users: Arc<dyn UserStore>,
    /// Password hasher.
    hasher: PasswordHasher,
    /// Token encoder.
    encoder: JwtEncoder,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("encoder", &self.encoder)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(users: Arc<dyn UserStore>, encoder: JwtEncoder) -> Self {
        Self {
            users,
            hasher: PasswordHasher::new(),
            encoder,
        }
    }

    /// Check a username and password and issue a token.
    ///
    /// Unknown users and wrong passwords fail identically.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginOutcome> {
        let username = normalize_username(username);
        if username.is_empty() || password.is_empty() {
            return Err(AppError::validation("Username and password are required"));
        }

        let found = self.users.find_by_username(username).await?;
        let verified = self.hasher.verify_account(
            password,
            found.as_ref().map(|user| user.password_hash.as_str()),
        )?;

        let user = match found {
            Some(user) if verified => user,
            Some(_) => {
                warn!(username = %username, "Login with wrong password");
                return Err(AppError::authentication("Invalid credentials"));
            }
            None => {
                warn!(username = %username, "Login for unknown user");
                return Err(AppError::authentication("Invalid credentials"));
            }
        };

        let (token, expires_at) = self
            .encoder
            .generate_token(user.id, user.unit_id, &user.username)?;

        info!(user_id = %user.id, unit_id = %user.unit_id, "Consumer logged in");
        Ok(LoginOutcome {
            token,
            expires_at,
            user,
        })
    }

    /// Create a consumer account bound to `unit_id`.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        unit_id: UnitId,
    ) -> AppResult<User> {
        let username = normalize_username(username);
        if username.is_empty() || password.is_empty() {
            return Err(AppError::validation("Username and password are required"));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .users
            .create(&CreateUser {
                username: username.to_string(),
                password_hash,
                unit_id,
            })
            .await?;

        info!(user_id = %user.id, unit_id = %unit_id, "Consumer account created");
        Ok(user)
    }
}

/// Usernames are stored and looked up without surrounding whitespace.
fn normalize_username(username: &str) -> &str {
    username.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use printq_auth::JwtDecoder;
    use printq_core::ErrorKind;
    use printq_core::config::AuthConfig;
    use printq_database::MemoryUserStore;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "service-test-secret".into(),
            ..AuthConfig::default()
        }
    }

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryUserStore::new()),
            JwtEncoder::new(&auth_config()),
        )
    }

    #[tokio::test]
    async fn test_login_issues_unit_bound_token() {
        let auth = service();
        auth.create_user("recepcao", "s3nha", UnitId::from(4))
            .await
            .unwrap();

        let outcome = auth.login("recepcao", "s3nha").await.unwrap();
        let claims = JwtDecoder::new(&auth_config())
            .decode_token(&outcome.token)
            .unwrap();
        assert_eq!(claims.unit, UnitId::from(4));
        assert_eq!(claims.username, "recepcao");
        assert_eq!(outcome.user.unit_id, UnitId::from(4));
    }

    #[tokio::test]
    async fn test_bad_credentials_look_the_same() {
        let auth = service();
        auth.create_user("recepcao", "s3nha", UnitId::from(4))
            .await
            .unwrap();

        let wrong_password = auth.login("recepcao", "nope").await.unwrap_err();
        let unknown_user = auth.login("ghost", "s3nha").await.unwrap_err();
        assert_eq!(wrong_password.kind, ErrorKind::Authentication);
        assert_eq!(unknown_user.kind, ErrorKind::Authentication);
        assert_eq!(wrong_password.message, unknown_user.message);
    }

    #[tokio::test]
    async fn test_username_whitespace_is_ignored_on_both_sides() {
        let auth = service();
        let user = auth
            .create_user(" bob ", "s3nha", UnitId::from(2))
            .await
            .unwrap();
        assert_eq!(user.username, "bob");

        for attempt in ["bob", " bob", "bob\t"] {
            let outcome = auth.login(attempt, "s3nha").await.unwrap();
            assert_eq!(outcome.user.id, user.id);
        }
        assert_eq!(
            auth.login("   ", "s3nha").await.unwrap_err().kind,
            ErrorKind::Validation
        );
    }

    #[tokio::test]
    async fn test_empty_fields_are_validation_errors() {
        let auth = service();
        assert_eq!(
            auth.login("", "x").await.unwrap_err().kind,
            ErrorKind::Validation
        );
        assert_eq!(
            auth.login("x", "").await.unwrap_err().kind,
            ErrorKind::Validation
        );
    }

    #[tokio::test]
    async fn test_duplicate_account_conflicts() {
        let auth = service();
        auth.create_user("a", "p", UnitId::from(1)).await.unwrap();
        let err = auth.create_user("a", "q", UnitId::from(2)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }
}
