//! JWT-based authentication extractor for Axum handlers.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use ecom_core::error::CoreError;
use ecom_core::types::DbId;

use crate::auth::jwt::{validate_token, TokenType};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer access token.
///
/// Use `AuthUser` for endpoints that require a caller and `Option<AuthUser>`
/// for endpoints where a token is optional. In both cases a token that is
/// present but invalid is rejected.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Authentication credentials were not provided".into(),
            ))
        })?;
        authenticate(token, state)
    }
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => authenticate(token, state).map(Some),
            None => Ok(None),
        }
    }
}

/// The token from an `Authorization: Bearer <token>` header, if one is sent.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = header.to_str().map_err(|_| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization header".into(),
        ))
    })?;

    value.strip_prefix("Bearer ").map(Some).ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        ))
    })
}

fn authenticate(token: &str, state: &AppState) -> Result<AuthUser, AppError> {
    let claims = validate_token(token.trim(), &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::InvalidToken(
            "Token is invalid or expired".into(),
        ))
    })?;

    if claims.token_type != TokenType::Access {
        return Err(AppError::Core(CoreError::InvalidToken(
            "Token has wrong type".into(),
        )));
    }

    Ok(AuthUser {
        user_id: claims.sub,
        username: claims.username,
    })
}
