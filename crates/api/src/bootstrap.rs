//! Startup tasks that run before the server accepts requests.

use ecom_core::error::CoreError;
use ecom_db::models::user::CreateUser;
use ecom_db::store::{CatalogStore, StoreError};

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::AdminCredentials;
use crate::error::{AppError, AppResult};

/// Create the configured admin account unless a user with that name exists.
///
/// Returns `true` when a user was created. An existing account is left
/// untouched, including its password.
pub async fn ensure_admin_user(
    store: &dyn CatalogStore,
    admin: &AdminCredentials,
) -> AppResult<bool> {
    if store.find_user_by_username(&admin.username).await?.is_some() {
        tracing::debug!(username = %admin.username, "Admin user already exists");
        return Ok(false);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(format!("ADMIN_PASSWORD: {msg}"))))?;

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        username: admin.username.clone(),
        password_hash,
    };
    match store.create_user(&input).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, username = %user.username, "Admin user created");
            Ok(true)
        }
        // Another instance created it between the lookup and the insert.
        Err(StoreError::DuplicateUsername(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
