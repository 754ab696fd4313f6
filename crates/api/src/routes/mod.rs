pub mod auth;
pub mod category;
pub mod generation;
pub mod health;
pub mod product;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                  service health (public)
///
/// /login/                                  obtain token pair (public)
/// /login/refresh/                          refresh access token (public)
///
/// /category/                               list, create
/// /category/{id}/                          get, put, patch, delete
///
/// /product/                                list, create
/// /product/export/                         CSV export
/// /product/{id}/                           get, put, patch, delete
///
/// /generated-dummy-products/               start generation, list jobs
/// /generated-dummy-products/{job_id}/      job status, cancel
/// /generate/                               debug page (public)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(category::router())
        .merge(product::router())
        .merge(generation::router())
}
