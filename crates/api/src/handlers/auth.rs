//! Handlers for `/login/` (token pair) and `/login/refresh/` (new access token).

use axum::extract::State;
use axum::Json;
use ecom_core::error::CoreError;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, validate_token, TokenType};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::state::AppState;

/// Same message for unknown users, wrong passwords, and inactive accounts.
const BAD_CREDENTIALS: &str = "No active account found with the given credentials";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub username: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /login/
pub async fn login(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginRequest>,
) -> AppResult<Json<TokenPairResponse>> {
    let user = state
        .store
        .find_user_by_username(&input.username)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| AppError::Core(CoreError::AuthenticationFailed(BAD_CREDENTIALS.into())))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(username = %input.username, "Login rejected");
        return Err(AppError::Core(CoreError::AuthenticationFailed(
            BAD_CREDENTIALS.into(),
        )));
    }

    let jwt = &state.config.jwt;
    let access = generate_access_token(user.id, &user.username, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let refresh = generate_refresh_token(user.id, &user.username, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(TokenPairResponse { access, refresh }))
}

/// POST /login/refresh/
///
/// The account must still exist and be active.
pub async fn refresh(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<RefreshRequest>,
) -> AppResult<Json<AccessTokenResponse>> {
    let claims = validate_token(&input.refresh, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::InvalidToken(
            "Token is invalid or expired".into(),
        ))
    })?;

    if claims.token_type != TokenType::Refresh {
        return Err(AppError::Core(CoreError::InvalidToken(
            "Token has wrong type".into(),
        )));
    }

    let user = state
        .store
        .find_user_by_id(claims.sub)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidToken(
                "User for this token no longer exists".into(),
            ))
        })?;

    let access = generate_access_token(user.id, &user.username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(AccessTokenResponse { access }))
}
