//! Job status types shared between the runner and its callers.

use chrono::Utc;
use ecom_core::types::Timestamp;
use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

/// Lifecycle state of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Accepted, waiting for a concurrency slot.
    Queued,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Point-in-time view of a job.
#[derive(Debug, Clone, Serialize)]
pub struct JobSnapshot {
    pub id: Uuid,
    pub state: JobState,
    /// Number of products the job was asked to create.
    pub requested: u32,
    /// Number of products inserted so far.
    pub created: u32,
    /// Number of categories the job had to seed first (0 or 10).
    pub categories_seeded: u32,
    pub error: Option<String>,
    pub submitted_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
}

impl JobSnapshot {
    pub(crate) fn queued(id: Uuid, requested: u32) -> Self {
        Self {
            id,
            state: JobState::Queued,
            requested,
            created: 0,
            categories_seeded: 0,
            error: None,
            submitted_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }
}

/// Returned by `GenerationRunner::submit`; observes one job.
///
/// Dropping the handle does not affect the job.
#[derive(Debug)]
pub struct JobHandle {
    id: Uuid,
    rx: watch::Receiver<JobSnapshot>,
}

impl JobHandle {
    pub(crate) fn new(id: Uuid, rx: watch::Receiver<JobSnapshot>) -> Self {
        Self { id, rx }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Latest snapshot without waiting.
    pub fn snapshot(&self) -> JobSnapshot {
        self.rx.borrow().clone()
    }

    /// Wait until `predicate` holds for the job's snapshot and return it.
    ///
    /// If the job disappears first, the last known snapshot is returned.
    pub async fn wait_until<F>(&mut self, predicate: F) -> JobSnapshot
    where
        F: FnMut(&JobSnapshot) -> bool,
    {
        let reached = self
            .rx
            .wait_for(predicate)
            .await
            .map(|snapshot| JobSnapshot::clone(&snapshot));
        match reached {
            Ok(snapshot) => snapshot,
            Err(_) => self.rx.borrow().clone(),
        }
    }

    /// Wait for the job to complete, fail, or be cancelled.
    pub async fn wait(mut self) -> JobSnapshot {
        self.wait_until(|s| s.state.is_terminal()).await
    }
}
