#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use ecom_api::auth::jwt::{generate_access_token, JwtConfig};
use ecom_api::config::ServerConfig;
use ecom_api::router::build_app_router;
use ecom_api::state::AppState;
use ecom_db::models::category::{Category, CreateCategory};
use ecom_db::models::product::{CreateProduct, Product};
use ecom_db::models::user::{CreateUser, User};
use ecom_db::store::{CatalogStore, MemoryCatalogStore};
use ecom_events::EventBus;
use ecom_worker::{GenerationRunner, GeneratorConfig, JobSnapshot};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults and no insert delay.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        generator: GeneratorConfig {
            insert_delay: Duration::ZERO,
            ..GeneratorConfig::default()
        },
        allow_anonymous_generation: false,
        admin: None,
    }
}

/// The router plus handles on what it is wired to.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryCatalogStore>,
    pub generator: Arc<GenerationRunner>,
    pub config: Arc<ServerConfig>,
}

impl TestApp {
    /// A fresh clone of the router; `oneshot` consumes it.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Create a user with an unusable password hash and return an access token for it.
    pub async fn token(&self) -> String {
        let user = create_user(&self.store, "tester", "not-a-real-hash").await;
        access_token(&self.config, &user)
    }
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

/// Build the full application with the production middleware stack over an
/// in-memory store.
pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let store = Arc::new(MemoryCatalogStore::new());
    let generator = Arc::new(GenerationRunner::new(
        Arc::clone(&store) as Arc<dyn CatalogStore>,
        Arc::new(EventBus::default()),
        config.generator.clone(),
    ));
    let config = Arc::new(config);

    let state = AppState {
        store: Arc::clone(&store) as Arc<dyn CatalogStore>,
        config: Arc::clone(&config),
        generator: Arc::clone(&generator),
    };
    let router = build_app_router(state, &config);

    TestApp {
        router,
        store,
        generator,
        config,
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_user(store: &MemoryCatalogStore, username: &str, password_hash: &str) -> User {
    store
        .create_user(&CreateUser {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        })
        .await
        .expect("user creation should succeed")
}

pub fn access_token(config: &ServerConfig, user: &User) -> String {
    generate_access_token(user.id, &user.username, &config.jwt).expect("token generation")
}

pub async fn create_category(store: &MemoryCatalogStore, name: &str) -> Category {
    store
        .create_category(&CreateCategory {
            name: name.to_string(),
        })
        .await
        .expect("category creation should succeed")
}

pub async fn create_product(
    store: &MemoryCatalogStore,
    category_id: i64,
    title: &str,
    price: f64,
) -> Product {
    store
        .create_product(&CreateProduct {
            category_id,
            title: title.to_string(),
            description: String::new(),
            price,
            status: None,
        })
        .await
        .expect("product creation should succeed")
}

/// Poll the runner until the job reaches a terminal state.
pub async fn wait_for_job(app: &TestApp, job_id: Uuid) -> JobSnapshot {
    for _ in 0..500 {
        if let Some(snapshot) = app.generator.get(job_id).await {
            if snapshot.state.is_terminal() {
                return snapshot;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} did not finish in time");
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let body = body.map(|json| json.to_string());
    send_raw(app, method, uri, token, body).await
}

/// Send a request with a raw JSON body, which may be malformed or empty.
pub async fn send_raw(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<String>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body)),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("body should be UTF-8")
}
