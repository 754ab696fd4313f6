use axum::routing::get;
use axum::Router;

use crate::handlers::category;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/category/", get(category::list).post(category::create))
        .route(
            "/category/{id}/",
            get(category::get_by_id)
                .put(category::replace)
                .patch(category::update)
                .delete(category::delete),
        )
}
