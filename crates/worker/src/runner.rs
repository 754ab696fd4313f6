//! The generation runner: accepts jobs and executes them in the background.
//!
//! Each job seeds categories when the catalog has none, then inserts
//! `requested` dummy products one at a time, sleeping `insert_delay` between
//! inserts. At most `max_concurrent_jobs` jobs insert at once; further jobs
//! wait in the `Queued` state. Submissions are refused once
//! `max_pending_jobs` jobs are queued or running.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use ecom_core::error::CoreError;
use ecom_core::generation::{dummy_product, pick_index, seed_category_names, validate_product_count};
use ecom_db::models::product::CreateProduct;
use ecom_db::store::{CatalogStore, StoreError};
use ecom_events::{CatalogEvent, EventBus, EventKind};
use tokio::sync::{watch, RwLock, Semaphore};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use uuid::Uuid;

use crate::config::GeneratorConfig;
use crate::job::{JobHandle, JobSnapshot, JobState};

/// Reasons a submission or job lookup is refused.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error("Too many generation jobs in progress (limit {limit}), try again later")]
    QueueFull { limit: usize },

    #[error("Generation job {0} not found")]
    NotFound(Uuid),

    #[error("Generation is shutting down")]
    ShuttingDown,
}

/// Why a running job stopped before inserting everything.
#[derive(Debug, thiserror::Error)]
enum JobError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No categories available to attach products to")]
    NoCategories,
}

/// How a job that did not fail came to an end.
enum Outcome {
    Finished,
    Cancelled,
}

struct JobEntry {
    status: Arc<watch::Sender<JobSnapshot>>,
    cancel: CancellationToken,
}

#[derive(Default)]
struct Registry {
    jobs: HashMap<Uuid, JobEntry>,
    /// Submission order, oldest first.
    order: VecDeque<Uuid>,
}

impl Registry {
    fn active(&self) -> usize {
        self.jobs
            .values()
            .filter(|entry| !entry.status.borrow().state.is_terminal())
            .count()
    }

    /// Drop the oldest finished jobs until at most `keep` entries remain.
    fn prune(&mut self, keep: usize) {
        if self.jobs.len() <= keep {
            return;
        }
        let mut excess = self.jobs.len() - keep;
        let jobs = &mut self.jobs;
        self.order.retain(|id| {
            if excess == 0 {
                return true;
            }
            let finished = jobs
                .get(id)
                .is_some_and(|entry| entry.status.borrow().state.is_terminal());
            if finished {
                jobs.remove(id);
                excess -= 1;
            }
            !finished
        });
    }
}

/// Everything a spawned job needs, detached from the runner itself.
struct JobContext {
    id: Uuid,
    requested: u32,
    store: Arc<dyn CatalogStore>,
    bus: Arc<EventBus>,
    permits: Arc<Semaphore>,
    status: Arc<watch::Sender<JobSnapshot>>,
    cancel: CancellationToken,
    insert_delay: Duration,
}

/// Owns the generation jobs of the process.
pub struct GenerationRunner {
    store: Arc<dyn CatalogStore>,
    bus: Arc<EventBus>,
    config: GeneratorConfig,
    permits: Arc<Semaphore>,
    registry: RwLock<Registry>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl GenerationRunner {
    pub fn new(store: Arc<dyn CatalogStore>, bus: Arc<EventBus>, config: GeneratorConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent_jobs.max(1)));
        Self {
            store,
            bus,
            config,
            permits,
            registry: RwLock::new(Registry::default()),
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Validate `count` and start a job inserting that many products.
    ///
    /// Returns as soon as the job is registered; the work happens on a
    /// spawned task.
    pub async fn submit(&self, count: i64) -> Result<JobHandle, GenerationError> {
        if self.shutdown.is_cancelled() {
            return Err(GenerationError::ShuttingDown);
        }
        let requested = validate_product_count(count, self.config.max_products_per_job)?;

        let mut registry = self.registry.write().await;
        if registry.active() >= self.config.max_pending_jobs {
            return Err(GenerationError::QueueFull {
                limit: self.config.max_pending_jobs,
            });
        }

        let id = Uuid::new_v4();
        let (tx, rx) = watch::channel(JobSnapshot::queued(id, requested));
        let status = Arc::new(tx);
        let cancel = self.shutdown.child_token();

        registry.jobs.insert(
            id,
            JobEntry {
                status: Arc::clone(&status),
                cancel: cancel.clone(),
            },
        );
        registry.order.push_back(id);
        registry.prune(self.config.job_history);
        drop(registry);

        self.bus.publish(
            CatalogEvent::new(EventKind::JobQueued, id)
                .with_payload(serde_json::json!({ "requested": requested })),
        );
        tracing::info!(job_id = %id, requested, "Generation job queued");

        self.tracker.spawn(run_job(JobContext {
            id,
            requested,
            store: Arc::clone(&self.store),
            bus: Arc::clone(&self.bus),
            permits: Arc::clone(&self.permits),
            status,
            cancel,
            insert_delay: self.config.insert_delay,
        }));

        Ok(JobHandle::new(id, rx))
    }

    pub async fn get(&self, id: Uuid) -> Option<JobSnapshot> {
        let registry = self.registry.read().await;
        registry
            .jobs
            .get(&id)
            .map(|entry| entry.status.borrow().clone())
    }

    /// All retained jobs, most recently submitted first.
    pub async fn list(&self) -> Vec<JobSnapshot> {
        let registry = self.registry.read().await;
        registry
            .order
            .iter()
            .rev()
            .filter_map(|id| registry.jobs.get(id))
            .map(|entry| entry.status.borrow().clone())
            .collect()
    }

    /// Request cancellation of a job. Products already inserted are kept.
    ///
    /// Cancelling a finished job is a no-op. Returns the snapshot at the time
    /// of the request; the state turns `Cancelled` once the task observes it.
    pub async fn cancel(&self, id: Uuid) -> Result<JobSnapshot, GenerationError> {
        let registry = self.registry.read().await;
        let entry = registry.jobs.get(&id).ok_or(GenerationError::NotFound(id))?;
        let snapshot = entry.status.borrow().clone();
        if !snapshot.state.is_terminal() {
            entry.cancel.cancel();
            tracing::info!(job_id = %id, "Generation job cancellation requested");
        }
        Ok(snapshot)
    }

    /// Cancel every job, refuse new ones, and wait up to `timeout` for the
    /// spawned tasks to finish. Returns `false` if the timeout elapsed.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.shutdown.cancel();
        self.tracker.close();
        match tokio::time::timeout(timeout, self.tracker.wait()).await {
            Ok(()) => {
                tracing::info!("Generation runner drained");
                true
            }
            Err(_) => {
                tracing::warn!(
                    remaining = self.tracker.len(),
                    "Generation runner did not drain within timeout"
                );
                false
            }
        }
    }
}

async fn run_job(ctx: JobContext) {
    let permit = tokio::select! {
        biased;
        _ = ctx.cancel.cancelled() => {
            finish(&ctx, JobState::Cancelled, None);
            return;
        }
        permit = Arc::clone(&ctx.permits).acquire_owned() => match permit {
            Ok(permit) => permit,
            Err(e) => {
                finish(&ctx, JobState::Failed, Some(e.to_string()));
                return;
            }
        },
    };

    ctx.status.send_modify(|s| {
        s.state = JobState::Running;
        s.started_at = Some(Utc::now());
    });
    ctx.bus.publish(CatalogEvent::new(EventKind::JobStarted, ctx.id));
    tracing::info!(job_id = %ctx.id, requested = ctx.requested, "Generation job started");

    let result = generate(&ctx).await;
    drop(permit);

    match result {
        Ok(Outcome::Finished) => finish(&ctx, JobState::Completed, None),
        Ok(Outcome::Cancelled) => finish(&ctx, JobState::Cancelled, None),
        Err(e) => {
            tracing::error!(job_id = %ctx.id, error = %e, "Generation job failed");
            finish(&ctx, JobState::Failed, Some(e.to_string()));
        }
    }
}

async fn generate(ctx: &JobContext) -> Result<Outcome, JobError> {
    let seeded = ctx
        .store
        .seed_categories_if_empty(&seed_category_names())
        .await?;
    if !seeded.is_empty() {
        let count = seeded.len() as u32;
        ctx.status.send_modify(|s| s.categories_seeded = count);
        ctx.bus.publish(
            CatalogEvent::new(EventKind::CategoriesSeeded, ctx.id)
                .with_payload(serde_json::json!({ "count": count })),
        );
    }

    let categories = ctx.store.list_categories().await?;
    if categories.is_empty() {
        return Err(JobError::NoCategories);
    }

    for inserted in 1..=ctx.requested {
        if ctx.cancel.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        let input = {
            let mut rng = rand::rng();
            let index = pick_index(&mut rng, categories.len()).unwrap_or_default();
            let dummy = dummy_product(&mut rng);
            CreateProduct {
                category_id: categories[index].id,
                title: dummy.title,
                description: dummy.description,
                price: dummy.price,
                status: Some(dummy.status),
            }
        };
        ctx.store.create_product(&input).await?;
        ctx.status.send_modify(|s| s.created = inserted);

        if inserted < ctx.requested && !ctx.insert_delay.is_zero() {
            tokio::select! {
                _ = ctx.cancel.cancelled() => return Ok(Outcome::Cancelled),
                _ = tokio::time::sleep(ctx.insert_delay) => {}
            }
        }
    }

    Ok(Outcome::Finished)
}

fn finish(ctx: &JobContext, state: JobState, error: Option<String>) {
    ctx.status.send_modify(|s| {
        s.state = state;
        s.error = error.clone();
        s.finished_at = Some(Utc::now());
    });
    let snapshot = ctx.status.borrow().clone();

    let kind = match state {
        JobState::Completed => EventKind::JobCompleted,
        JobState::Failed => EventKind::JobFailed,
        _ => EventKind::JobCancelled,
    };
    ctx.bus.publish(CatalogEvent::new(kind, ctx.id).with_payload(serde_json::json!({
        "requested": snapshot.requested,
        "created": snapshot.created,
        "error": snapshot.error,
    })));
    tracing::info!(
        job_id = %ctx.id,
        state = ?state,
        created = snapshot.created,
        requested = snapshot.requested,
        "Generation job finished"
    );
}
