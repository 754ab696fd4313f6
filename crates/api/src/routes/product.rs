use axum::routing::get;
use axum::Router;

use crate::handlers::product;
use crate::state::AppState;

/// `/product/export/` is a static segment, so it wins over `/product/{id}/`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/product/", get(product::list).post(product::create))
        .route("/product/export/", get(product::export_csv))
        .route(
            "/product/{id}/",
            get(product::get_by_id)
                .put(product::replace)
                .patch(product::update)
                .delete(product::delete),
        )
}
