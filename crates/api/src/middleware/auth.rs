//! Session authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use g1000_core::error::CoreError;
use g1000_core::roles::Role;
use g1000_core::types::DbId;

use crate::auth::cookie::session_token;
use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated identity extracted from the session token.
///
/// The token is read from `Authorization: Bearer <token>` first, then from
/// the `g1000_session` cookie. Every failure (missing, malformed, expired,
/// bad signature, unknown role) is the same `Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// Normalized email the session was issued for.
    pub email: String,
    pub role: Role,
}

fn unauthorized() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Missing, invalid, or expired session".into(),
    ))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let token = bearer
            .or_else(|| session_token(&parts.headers))
            .ok_or_else(unauthorized)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| unauthorized())?;
        let role: Role = claims.role.parse().map_err(|_| unauthorized())?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            role,
        })
    }
}
