//! Authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::auth::Identity;
use crate::error::ApiError;
use crate::state::AppState;

/// Extractor that requires a valid session token.
///
/// # Example
///
/// ```rust,ignore
/// async fn create_item(AuthUser(who): AuthUser, ...) -> ApiResult<...> {
///     info!(user_id = who.user_id, "Creating item");
/// }
/// ```
pub struct AuthUser(pub Identity);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = verify_headers(state, &parts.headers)?;
        Ok(Self(identity))
    }
}

/// Runs the session verifier against a request's headers.
pub fn verify_headers(state: &AppState, headers: &HeaderMap) -> Result<Identity, ApiError> {
    let header = match headers.get(AUTHORIZATION) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| ApiError::InvalidToken("non-ascii header".to_string()))?,
        ),
        None => None,
    };

    Ok(state.verifier.verify_header(header)?)
}
