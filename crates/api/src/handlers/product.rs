//! Handlers for the `/product/` resource and its CSV export.

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ecom_core::error::CoreError;
use ecom_core::export::{build_csv, PRODUCT_CSV_FILENAME, PRODUCT_CSV_HEADER};
use ecom_core::types::DbId;
use ecom_db::models::product::{CreateProduct, Product, UpdateProduct};

use crate::error::{AppError, AppResult};
use crate::extract::{ValidJson, ValidPath};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Product",
        id,
    })
}

/// POST /product/
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state.store.create_product(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /product/
pub async fn list(_user: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let products = state.store.list_products().await?;
    Ok(Json(products))
}

/// GET /product/{id}/
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Json<Product>> {
    let product = state
        .store
        .find_product(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(product))
}

/// PUT /product/{id}/
///
/// Every field is replaced; an omitted `status` resets to `true`.
pub async fn replace(
    user: AuthUser,
    state: State<AppState>,
    id: ValidPath<DbId>,
    ValidJson(input): ValidJson<CreateProduct>,
) -> AppResult<Json<Product>> {
    update(user, state, id, ValidJson(UpdateProduct::from(input))).await
}

/// PATCH /product/{id}/
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
    ValidJson(input): ValidJson<UpdateProduct>,
) -> AppResult<Json<Product>> {
    let product = state
        .store
        .update_product(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(product))
}

/// DELETE /product/{id}/
pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<StatusCode> {
    if state.store.delete_product(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /product/export/
///
/// Every product in id order, as a CSV attachment.
pub async fn export_csv(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = state.store.list_products_for_export().await?;
    let csv = build_csv(&PRODUCT_CSV_HEADER, rows.iter().map(|row| row.csv_fields()));

    tracing::info!(user_id = user.user_id, rows = rows.len(), "Product export generated");

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/csv".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{PRODUCT_CSV_FILENAME}\""),
            ),
        ],
        csv,
    ))
}
