//! Handlers for `/generated-dummy-products/` and the `/generate/` debug page.
//!
//! Generation needs a bearer token unless `GENERATION_ALLOW_ANONYMOUS` is set.
//! A token that is sent but invalid is rejected either way.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use ecom_core::error::CoreError;
use ecom_worker::{GenerationError, JobSnapshot};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::extract::ValidPath;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const DEBUG_PAGE: &str = include_str!("../../templates/generate.html");

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// `number` as sent by the client: a JSON integer or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CountParam {
    Int(i64),
    Text(String),
}

/// Body of `POST /generated-dummy-products/`. An empty body is allowed.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub number: Option<CountParam>,
}

impl GenerateRequest {
    pub fn from_body(body: &[u8]) -> AppResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
    }

    /// Requested product count, not yet range-checked.
    pub fn count(&self, default: u32) -> AppResult<i64> {
        match &self.number {
            None => Ok(i64::from(default)),
            Some(CountParam::Int(n)) => Ok(*n),
            Some(CountParam::Text(s)) => s.trim().parse().map_err(|_| {
                AppError::Core(CoreError::Validation(
                    "number: must be an integer".into(),
                ))
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub status: &'static str,
    pub job_id: Uuid,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /generated-dummy-products/
///
/// Returns as soon as the job is queued.
pub async fn generate(
    user: Option<AuthUser>,
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<GenerateResponse>> {
    let caller = authorize(user, &state)?;

    let request = GenerateRequest::from_body(&body)?;
    let count = request.count(state.generator.config().default_product_count)?;
    let handle = state.generator.submit(count).await?;

    tracing::info!(
        job_id = %handle.id(),
        count,
        caller = %caller,
        "Dummy product generation requested"
    );

    Ok(Json(GenerateResponse {
        status: "generation started",
        job_id: handle.id(),
    }))
}

/// GET /generated-dummy-products/
pub async fn list_jobs(
    user: Option<AuthUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<JobSnapshot>>> {
    authorize(user, &state)?;
    Ok(Json(state.generator.list().await))
}

/// GET /generated-dummy-products/{job_id}/
pub async fn get_job(
    user: Option<AuthUser>,
    State(state): State<AppState>,
    ValidPath(job_id): ValidPath<Uuid>,
) -> AppResult<Json<JobSnapshot>> {
    authorize(user, &state)?;
    let snapshot = state
        .generator
        .get(job_id)
        .await
        .ok_or(GenerationError::NotFound(job_id))?;
    Ok(Json(snapshot))
}

/// DELETE /generated-dummy-products/{job_id}/
///
/// Requests cancellation; products already inserted stay.
pub async fn cancel_job(
    user: Option<AuthUser>,
    State(state): State<AppState>,
    ValidPath(job_id): ValidPath<Uuid>,
) -> AppResult<Json<JobSnapshot>> {
    let caller = authorize(user, &state)?;
    let snapshot = state.generator.cancel(job_id).await?;
    tracing::info!(job_id = %job_id, caller = %caller, "Generation job cancel requested");
    Ok(Json(snapshot))
}

/// GET /generate/
pub async fn debug_page() -> Html<&'static str> {
    Html(DEBUG_PAGE)
}

/// Apply the generation auth policy. Returns a label for logging.
fn authorize(user: Option<AuthUser>, state: &AppState) -> AppResult<String> {
    match user {
        Some(user) => Ok(user.username),
        None if state.config.allow_anonymous_generation => Ok("anonymous".to_string()),
        None => Err(AppError::Core(CoreError::Unauthorized(
            "Authentication credentials were not provided".into(),
        ))),
    }
}
