//! Handlers for the `/category/` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ecom_core::error::CoreError;
use ecom_core::types::DbId;
use ecom_db::models::category::{Category, CreateCategory, UpdateCategory};

use crate::error::{AppError, AppResult};
use crate::extract::{ValidJson, ValidPath};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    })
}

/// POST /category/
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = state.store.create_category(&input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /category/
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = state.store.list_categories().await?;
    Ok(Json(categories))
}

/// GET /category/{id}/
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Json<Category>> {
    let category = state
        .store
        .find_category(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(category))
}

/// PUT /category/{id}/
pub async fn replace(
    user: AuthUser,
    state: State<AppState>,
    id: ValidPath<DbId>,
    ValidJson(input): ValidJson<CreateCategory>,
) -> AppResult<Json<Category>> {
    update(user, state, id, ValidJson(UpdateCategory::from(input))).await
}

/// PATCH /category/{id}/
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
    ValidJson(input): ValidJson<UpdateCategory>,
) -> AppResult<Json<Category>> {
    let category = state
        .store
        .update_category(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(category))
}

/// DELETE /category/{id}/
///
/// Products in the category are deleted with it.
pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<StatusCode> {
    if state.store.delete_category(id).await? {
        tracing::info!(category_id = id, "Category deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
