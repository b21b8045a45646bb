//! Staff login.
//!
//! Checks a username/password pair against the credential store and
//! issues a session token.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use tavola_core::validation::validate_login_field;
use tavola_core::UserSummary;
use tavola_db::UserRepository;

use crate::auth::{hash_password, verify_password, AuthError, JwtManager};

/// Hashed at startup. Unknown usernames are verified against this hash.
const DUMMY_PASSWORD: &str = "tavola-dummy-password";

/// Successful login payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// Verifies credentials and issues session tokens.
pub struct Authenticator {
    users: UserRepository,
    jwt: Arc<JwtManager>,
    dummy_hash: String,
}

impl Authenticator {
    /// Create a new authenticator.
    pub fn new(users: UserRepository, jwt: Arc<JwtManager>) -> Result<Self, AuthError> {
        Ok(Authenticator {
            users,
            jwt,
            dummy_hash: hash_password(DUMMY_PASSWORD)?,
        })
    }

    /// Log a user in.
    ///
    /// Unknown usernames and wrong passwords both fail with
    /// `AuthError::InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError> {
        if validate_login_field("username", username).is_err()
            || validate_login_field("password", password).is_err()
        {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self.users.find_by_username(username).await?;

        let Some(user) = user else {
            let _ = verify_password(password, &self.dummy_hash);
            warn!(username = %username, "Login failed");
            return Err(AuthError::InvalidCredentials);
        };

        if verify_password(password, &user.password_hash).is_err() {
            warn!(username = %username, "Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.jwt.issue(&user)?;

        info!(user_id = user.id, role = %user.role, "Token issued successfully");

        Ok(LoginResponse {
            token,
            user: user.summary(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tavola_core::Role;
    use tavola_db::{Database, DbConfig};

    async fn authenticator() -> (Database, Authenticator) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let hash = hash_password("admin123").unwrap();
        db.users()
            .insert("Admin", "admin", &hash, Role::Manager)
            .await
            .unwrap();

        let jwt = Arc::new(JwtManager::new("test-secret", 12));
        let auth = Authenticator::new(db.users(), jwt).unwrap();
        (db, auth)
    }

    #[tokio::test]
    async fn test_login_success() {
        let (_db, auth) = authenticator().await;

        let response = auth.login("admin", "admin123").await.unwrap();
        assert!(!response.token.is_empty());
        assert_eq!(response.user.username, "admin");
        assert_eq!(response.user.role, Role::Manager);
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_look_the_same() {
        let (_db, auth) = authenticator().await;

        let wrong_password = auth.login("admin", "nope").await.unwrap_err();
        let unknown_user = auth.login("ghost", "admin123").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_empty_fields_rejected() {
        let (_db, auth) = authenticator().await;

        assert!(matches!(
            auth.login("", "admin123").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("admin", "").await,
            Err(AuthError::InvalidCredentials)
        ));
    }
}
