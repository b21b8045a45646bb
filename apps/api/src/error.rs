//! Error types for the HTTP API.
//!
//! Every handler returns `ApiResult<T>`. Errors render as
//! `{"error": "<message>"}` with these statuses:
//!
//! ```text
//! InvalidCredentials / MissingToken / InvalidToken  → 401
//! EmptyCart / InvalidCart / BadRequest              → 400
//! NotFound                                          → 404
//! OrderPersistenceFailure / Internal                → 500 (detail logged only)
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use tavola_core::CoreError;
use tavola_db::DbError;

use crate::auth::AuthError;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("no token")]
    MissingToken,

    /// Malformed header, bad signature, or expired token.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("items required")]
    EmptyCart,

    #[error("invalid cart: {0}")]
    InvalidCart(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    /// The checkout transaction was rolled back.
    #[error("order persistence failed: {0}")]
    OrderPersistenceFailure(#[source] DbError),

    #[error("database error: {0}")]
    Database(#[from] DbError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials | ApiError::MissingToken | ApiError::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::EmptyCart | ApiError::InvalidCart(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::OrderPersistenceFailure(_)
            | ApiError::Database(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The text the terminal sees. Never includes store details.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::InvalidCredentials => "invalid credentials".to_string(),
            ApiError::MissingToken => "no token".to_string(),
            ApiError::InvalidToken(_) => "invalid token".to_string(),
            ApiError::EmptyCart => "items required".to_string(),
            ApiError::InvalidCart(msg) | ApiError::BadRequest(msg) => msg.clone(),
            ApiError::NotFound => "not found".to_string(),
            ApiError::OrderPersistenceFailure(_) => "could not create order".to_string(),
            ApiError::Database(_) | ApiError::Internal(_) => "internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::MissingToken => ApiError::MissingToken,
            AuthError::MalformedToken => ApiError::InvalidToken("malformed header".to_string()),
            AuthError::InvalidToken(reason) => ApiError::InvalidToken(reason),
            AuthError::Store(db) => ApiError::Database(db),
            AuthError::TokenIssue(msg) => ApiError::Internal(msg),
            AuthError::PasswordHash => ApiError::Internal("password hashing failed".to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyCart => ApiError::EmptyCart,
            other => ApiError::InvalidCart(other.to_string()),
        }
    }
}

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statuses() {
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::EmptyCart.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::OrderPersistenceFailure(DbError::PoolExhausted).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_details_are_hidden() {
        let err = ApiError::OrderPersistenceFailure(DbError::ForeignKeyViolation {
            message: "FOREIGN KEY constraint failed".to_string(),
        });
        assert_eq!(err.public_message(), "could not create order");

        let err = ApiError::Database(DbError::QueryFailed("no such table: users".to_string()));
        assert!(!err.public_message().contains("users"));
    }

    #[test]
    fn test_auth_error_public_messages() {
        assert_eq!(
            ApiError::from(AuthError::MalformedToken).public_message(),
            "invalid token"
        );
        assert_eq!(
            ApiError::from(AuthError::MissingToken).public_message(),
            "no token"
        );
    }

    #[test]
    fn test_core_errors() {
        assert!(matches!(ApiError::from(CoreError::EmptyCart), ApiError::EmptyCart));
        assert!(matches!(
            ApiError::from(CoreError::UnknownItem(9)),
            ApiError::InvalidCart(_)
        ));
    }
}
