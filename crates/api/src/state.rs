use std::sync::Arc;

use ecom_db::store::CatalogStore;
use ecom_worker::GenerationRunner;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Catalog storage (PostgreSQL in production, in-memory in tests).
    pub store: Arc<dyn CatalogStore>,
    pub config: Arc<ServerConfig>,
    /// Background runner for dummy product generation.
    pub generator: Arc<GenerationRunner>,
}
