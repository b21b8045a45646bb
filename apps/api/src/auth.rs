//! Session tokens, bearer header parsing, and password hashing.
//!
//! ## Token Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Token Lifecycle                            │
//! │                                                                         │
//! │  POST /api/login                                                       │
//! │       │  Authenticator verifies Argon2 hash                            │
//! │       ▼                                                                 │
//! │  JwtManager::issue(user)  ──► HS256 JWT { sub, username, role,         │
//! │                                          iat, exp = iat + 12h, jti }   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Terminal sends  "Authorization: Bearer <jwt>"  on every mutation      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SessionVerifier::verify_header()                                      │
//! │       ├── no header             → MissingToken                         │
//! │       ├── not "Bearer <token>"  → MalformedToken                       │
//! │       ├── bad signature/expired → InvalidToken                         │
//! │       └── ok                    → Identity { user_id, username, role } │
//! │                                                                         │
//! │  No database lookup and no revocation list: a token lives until exp.   │
//! │  Rotating JWT_SECRET invalidates every outstanding token.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tavola_core::{Role, User};

// =============================================================================
// Errors
// =============================================================================

/// Authentication and session errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown username or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No `Authorization` header on a gated request.
    #[error("no token")]
    MissingToken,

    /// Header present but not of the form `Bearer <token>`.
    #[error("malformed authorization header")]
    MalformedToken,

    /// Bad signature, expired, or claims that don't parse.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The token could not be signed.
    #[error("failed to issue token: {0}")]
    TokenIssue(String),

    /// Hashing a new password failed.
    #[error("password hashing error")]
    PasswordHash,

    /// The credential store could not be read.
    #[error("credential store error: {0}")]
    Store(#[from] tavola_db::DbError),
}

// =============================================================================
// Claims
// =============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    pub username: String,

    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// Who is making a request, as asserted by a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

impl TryFrom<Claims> for Identity {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))?;

        Ok(Identity {
            user_id,
            username: claims.username,
            role: claims.role,
        })
    }
}

// =============================================================================
// JWT Manager
// =============================================================================

/// Signs and validates session tokens.
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        JwtManager {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user`, valid from now.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token as if it had been signed at `issued_at`.
    pub fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))
    }

    /// Validate and decode a token.
    ///
    /// Expiry is checked with zero leeway.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

// =============================================================================
// Session Verifier
// =============================================================================

/// Gate in front of mutating requests.
pub struct SessionVerifier {
    jwt: std::sync::Arc<JwtManager>,
}

impl SessionVerifier {
    pub fn new(jwt: std::sync::Arc<JwtManager>) -> Self {
        SessionVerifier { jwt }
    }

    /// Verifies the raw value of an `Authorization` header.
    pub fn verify_header(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let header = header.ok_or(AuthError::MissingToken)?;
        let token = extract_bearer_token(header)?;
        let claims = self.jwt.validate_token(token)?;

        Identity::try_from(claims)
    }
}

/// Extract the token from a `Bearer <token>` header value.
///
/// The value must split on single spaces into exactly two non-empty parts.
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AuthError> {
    let mut parts = auth_header.split(' ');

    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedToken),
    }
}

// =============================================================================
// Passwords
// =============================================================================

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a PHC-format hash.
///
/// Any failure, including an unparseable hash, is `InvalidCredentials`.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn user() -> User {
        User {
            id: 7,
            name: "Asha".to_string(),
            username: "asha".to_string(),
            password_hash: String::new(),
            role: Role::Cashier,
        }
    }

    fn verifier(manager: JwtManager) -> SessionVerifier {
        SessionVerifier::new(Arc::new(manager))
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret", 12);
        let token = manager.issue(&user()).unwrap();

        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.username, "asha");
        assert_eq!(claims.role, Role::Cashier);
        assert_eq!(claims.exp - claims.iat, 12 * 3600);
        assert_eq!(manager.ttl(), Duration::hours(12));
    }

    #[test]
    fn test_verify_header_returns_identity() {
        let manager = JwtManager::new("test-secret", 12);
        let token = manager.issue(&user()).unwrap();
        let header = format!("Bearer {}", token);

        let identity = verifier(manager).verify_header(Some(&header)).unwrap();
        assert_eq!(
            identity,
            Identity {
                user_id: 7,
                username: "asha".to_string(),
                role: Role::Cashier,
            }
        );
    }

    #[test]
    fn test_missing_and_malformed_headers() {
        let v = verifier(JwtManager::new("test-secret", 12));

        assert!(matches!(v.verify_header(None), Err(AuthError::MissingToken)));
        for header in ["", "Bearer", "Bearer ", "Token abc", "Bearer a b", "abc"] {
            assert!(
                matches!(v.verify_header(Some(header)), Err(AuthError::MalformedToken)),
                "header {:?} should be malformed",
                header
            );
        }
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = JwtManager::new("test-secret", 12);
        let issued = Utc::now() - Duration::hours(13);
        let token = manager.issue_at(&user(), issued).unwrap();
        let header = format!("Bearer {}", token);

        assert!(matches!(
            verifier(manager).verify_header(Some(&header)),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let token = JwtManager::new("secret-a", 12).issue(&user()).unwrap();
        let header = format!("Bearer {}", token);

        assert!(matches!(
            verifier(JwtManager::new("secret-b", 12)).verify_header(Some(&header)),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("admin123").unwrap();
        assert!(hash.starts_with("$argon2"));

        assert!(verify_password("admin123", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            verify_password("admin123", "not-a-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
