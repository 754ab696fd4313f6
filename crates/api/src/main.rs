use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use ecom_api::bootstrap::ensure_admin_user;
use ecom_api::config::ServerConfig;
use ecom_api::router::build_app_router;
use ecom_api::state::AppState;
use ecom_db::store::{CatalogStore, PgCatalogStore};
use ecom_events::{EventBus, EventLogger};
use ecom_worker::GenerationRunner;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");
    if config.allow_anonymous_generation {
        tracing::warn!(
            "GENERATION_ALLOW_ANONYMOUS is enabled: anyone can start dummy product generation"
        );
    }

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = ecom_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    ecom_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    ecom_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let store: Arc<dyn CatalogStore> = Arc::new(PgCatalogStore::new(pool));

    // --- Admin bootstrap ---
    if let Some(admin) = &config.admin {
        ensure_admin_user(store.as_ref(), admin)
            .await
            .expect("Failed to bootstrap admin user");
    }

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let logger_handle = tokio::spawn(EventLogger::run(event_bus.subscribe()));

    // --- Generation runner ---
    let generator = Arc::new(GenerationRunner::new(
        Arc::clone(&store),
        Arc::clone(&event_bus),
        config.generator.clone(),
    ));
    tracing::info!(
        max_concurrent_jobs = config.generator.max_concurrent_jobs,
        max_pending_jobs = config.generator.max_pending_jobs,
        "Generation runner started"
    );

    // --- App state ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        generator: Arc::clone(&generator),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Running jobs are cancelled; rows already inserted stay.
    generator
        .shutdown(Duration::from_secs(config.shutdown_timeout_secs))
        .await;
    drop(generator);

    // The logger exits once the last bus handle is gone.
    drop(event_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), logger_handle).await;
    tracing::info!("Event logger stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "ecom_api=debug,ecom_worker=debug,ecom_events=debug,tower_http=debug".into()
    });
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
