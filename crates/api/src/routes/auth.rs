use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Token endpoints. No authentication required.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login/", post(auth::login))
        .route("/login/refresh/", post(auth::refresh))
}
