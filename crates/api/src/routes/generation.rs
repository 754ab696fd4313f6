use axum::routing::get;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/generated-dummy-products/",
            get(generation::list_jobs).post(generation::generate),
        )
        .route(
            "/generated-dummy-products/{job_id}/",
            get(generation::get_job).delete(generation::cancel_job),
        )
        .route("/generate/", get(generation::debug_page))
}
